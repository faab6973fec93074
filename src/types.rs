use serde::{Deserialize, Serialize};

/// One of the eight named teaching strategies the scorer can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    DirectInstruction,
    Socratic,
    WorkedExample,
    ProblemBased,
    Scaffolding,
    Narrative,
    AnalogyBased,
    VisualDemo,
}

impl Methodology {
    /// Fixed tie-break order: earlier entries win equal scores.
    pub const PRIORITY: [Methodology; 8] = [
        Self::DirectInstruction,
        Self::WorkedExample,
        Self::Scaffolding,
        Self::Socratic,
        Self::ProblemBased,
        Self::VisualDemo,
        Self::Narrative,
        Self::AnalogyBased,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectInstruction => "direct_instruction",
            Self::Socratic => "socratic",
            Self::WorkedExample => "worked_example",
            Self::ProblemBased => "problem_based",
            Self::Scaffolding => "scaffolding",
            Self::Narrative => "narrative",
            Self::AnalogyBased => "analogy_based",
            Self::VisualDemo => "visual_demo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct_instruction" => Some(Self::DirectInstruction),
            "socratic" => Some(Self::Socratic),
            "worked_example" => Some(Self::WorkedExample),
            "problem_based" => Some(Self::ProblemBased),
            "scaffolding" => Some(Self::Scaffolding),
            "narrative" => Some(Self::Narrative),
            "analogy_based" => Some(Self::AnalogyBased),
            "visual_demo" => Some(Self::VisualDemo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudentLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl StudentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "advanced" => Self::Advanced,
            _ => Self::Intermediate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Factual,
    #[default]
    Conceptual,
    Procedural,
    Analytical,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Conceptual => "conceptual",
            Self::Procedural => "procedural",
            Self::Analytical => "analytical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfusionLevel {
    #[default]
    None,
    Slight,
    Moderate,
    High,
}

impl ConfusionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Slight => "slight",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

/// The four sensory learning channels of the style profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningChannel {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
}

impl LearningChannel {
    pub const ALL: [LearningChannel; 4] = [
        Self::Visual,
        Self::Auditory,
        Self::Kinesthetic,
        Self::Reading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::Reading => "reading",
        }
    }

    /// Strategies that primarily exercise this channel.
    pub fn strategies(&self) -> &'static [Methodology] {
        match self {
            Self::Visual => &[Methodology::VisualDemo],
            Self::Auditory => &[Methodology::Narrative, Methodology::Socratic],
            Self::Kinesthetic => &[Methodology::ProblemBased, Methodology::Scaffolding],
            Self::Reading => &[Methodology::DirectInstruction, Methodology::WorkedExample],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
    ContentCreator,
    Mentor,
}

/// One tutoring exchange. Immutable once appended to the interaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub student_id: String,
    pub session_id: String,
    pub concept: String,
    pub subject: String,
    /// Teaching-method tag used for this exchange. Usually one of the eight
    /// strategy names, but free-form tags are tolerated downstream.
    pub methodology: String,
    /// Success indicator in [0,1].
    pub success: f64,
    /// Declared difficulty in [1,10].
    pub difficulty: u8,
    pub response_time_seconds: f64,
    pub timestamp_ms: i64,
}

impl Interaction {
    /// Clamps out-of-range numeric fields instead of rejecting the record.
    pub fn sanitized(mut self) -> Self {
        self.success = if self.success.is_finite() {
            self.success.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.difficulty = self.difficulty.clamp(1, 10);
        self.response_time_seconds = if self.response_time_seconds.is_finite() {
            self.response_time_seconds.max(0.0)
        } else {
            0.0
        };
        self
    }
}

/// Per-(student, concept, subject) mastery record, recomputed wholesale on
/// each medium-term refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptMastery {
    pub student_id: String,
    pub concept: String,
    pub subject: String,
    /// Always in [0,100].
    pub mastery_level: u8,
    pub attempts_count: u32,
    pub success_rate: f64,
    pub last_practiced_ms: i64,
    /// Minutes; 0 = mastered, -1 = undeterminable.
    pub estimated_minutes_to_mastery: i64,
    /// Optimistic-concurrency counter, bumped on every upsert.
    pub version: i64,
}

/// Relative preference across the four learning channels, on a 0-100 scale.
/// The invariant that the four values sum to exactly 100 is maintained by
/// the analyzer's remainder rule, not re-normalized here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreferences {
    pub visual: f64,
    pub auditory: f64,
    pub kinesthetic: f64,
    pub reading: f64,
}

impl Default for StylePreferences {
    fn default() -> Self {
        Self {
            visual: 25.0,
            auditory: 25.0,
            kinesthetic: 25.0,
            reading: 25.0,
        }
    }
}

impl StylePreferences {
    pub fn get(&self, channel: LearningChannel) -> f64 {
        match channel {
            LearningChannel::Visual => self.visual,
            LearningChannel::Auditory => self.auditory,
            LearningChannel::Kinesthetic => self.kinesthetic,
            LearningChannel::Reading => self.reading,
        }
    }

    pub fn sum(&self) -> f64 {
        self.visual + self.auditory + self.kinesthetic + self.reading
    }

    /// Channel with the highest preference; ties resolve in the fixed order
    /// visual, auditory, kinesthetic, reading.
    pub fn dominant_channel(&self) -> LearningChannel {
        let mut best = LearningChannel::Visual;
        let mut best_score = self.visual;
        for channel in [
            LearningChannel::Auditory,
            LearningChannel::Kinesthetic,
            LearningChannel::Reading,
        ] {
            let score = self.get(channel);
            if score > best_score {
                best = channel;
                best_score = score;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodologyPreference {
    pub methodology: String,
    pub success_rate: f64,
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStyleProfile {
    pub student_id: String,
    pub preferences: StylePreferences,
    /// Confidence in [0,1] that the preferences reflect a real signal.
    pub confidence: f64,
    pub optimal_pace: Pace,
    /// Methodology tags ranked by observed success rate, best first.
    pub ranked_methodologies: Vec<MethodologyPreference>,
    pub recommendations: Vec<String>,
    pub sample_count: u32,
    pub updated_at_ms: i64,
}

impl LearningStyleProfile {
    /// Neutral profile used whenever fewer than the minimum interactions
    /// exist for a student.
    pub fn neutral(student_id: impl Into<String>, now_ms: i64) -> Self {
        Self {
            student_id: student_id.into(),
            preferences: StylePreferences::default(),
            confidence: 0.1,
            optimal_pace: Pace::Medium,
            ranked_methodologies: Vec::new(),
            recommendations: Vec::new(),
            sample_count: 0,
            updated_at_ms: now_ms,
        }
    }
}

/// Ephemeral description of the question being answered right now.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeachingContext {
    pub student_level: StudentLevel,
    pub subject: String,
    pub question_type: QuestionType,
    pub confusion_level: ConfusionLevel,
    pub previous_attempts: u32,
    /// Explicit learner override; always wins, bypassing scoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_style: Option<Methodology>,
}

/// One scored signal that contributed to a strategy's total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAdjustment {
    pub source: String,
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodologyRecommendation {
    pub method: Methodology,
    pub score: f64,
    /// Winning score normalized to [0,1]; 1.0 for explicit overrides.
    pub confidence: f64,
    pub reasoning: String,
    pub next_steps: Vec<String>,
    pub follow_up_questions: Vec<String>,
    /// The winning strategy's positive adjustments, largest first.
    pub adjustments: Vec<ScoreAdjustment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyArea {
    pub difficulty: u8,
    pub success_rate: f64,
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub concept_name: String,
    pub current_mastery: u8,
    pub learning_velocity: f64,
    pub retention_rate: f64,
    pub trend: Trend,
    pub difficulty_areas: Vec<DifficultyArea>,
    pub next_steps: Vec<String>,
    /// Hours; 0 = mastered, -1 = undeterminable.
    pub estimated_hours_to_mastery: i64,
}
