//! Context-sensitive teaching-strategy selection.
//!
//! Every signal contributes an additive adjustment to a per-strategy score,
//! so the effect of each one stays independently auditable in the emitted
//! adjustment list. Scoring is pure: identical context and profile always
//! produce the identical recommendation.

use crate::config::ScoringParams;
use crate::decision::templates::template_for;
use crate::types::{
    ConfusionLevel, LearningStyleProfile, Methodology, MethodologyRecommendation, QuestionType,
    ScoreAdjustment, StudentLevel, TeachingContext,
};

pub struct MethodologyScorer {
    params: ScoringParams,
}

struct ScoreTable {
    entries: Vec<(Methodology, f64, Vec<ScoreAdjustment>)>,
}

impl ScoreTable {
    fn new(base: f64) -> Self {
        Self {
            entries: Methodology::PRIORITY
                .iter()
                .map(|m| (*m, base, Vec::new()))
                .collect(),
        }
    }

    fn bump(&mut self, method: Methodology, delta: f64, source: &str) {
        for (m, score, adjustments) in &mut self.entries {
            if *m == method {
                *score += delta;
                adjustments.push(ScoreAdjustment {
                    source: source.to_string(),
                    delta,
                });
                return;
            }
        }
    }

    fn bump_all(&mut self, rules: &[(Methodology, f64)], source: &str) {
        for (method, delta) in rules {
            self.bump(*method, *delta, source);
        }
    }

    /// Argmax over the fixed priority order: a later strategy must strictly
    /// beat the incumbent, so equal scores resolve deterministically.
    fn winner(self) -> (Methodology, f64, Vec<ScoreAdjustment>) {
        let mut best: Option<(Methodology, f64, Vec<ScoreAdjustment>)> = None;
        for (method, score, adjustments) in self.entries {
            match &best {
                Some((_, best_score, _)) if score <= *best_score => {}
                _ => best = Some((method, score, adjustments)),
            }
        }
        best.expect("score table is never empty")
    }
}

impl MethodologyScorer {
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    pub fn recommend(
        &self,
        context: &TeachingContext,
        profile: Option<&LearningStyleProfile>,
    ) -> MethodologyRecommendation {
        use Methodology::*;

        if let Some(preferred) = context.preferred_style {
            // Explicit learner preference wins unconditionally; scoring is
            // bypassed by contract, not as a fallback.
            let template = template_for(preferred);
            return MethodologyRecommendation {
                method: preferred,
                score: self.params.base_score,
                confidence: 1.0,
                reasoning: format!(
                    "Explicit learner preference for '{}' honored; scoring bypassed",
                    preferred.as_str()
                ),
                next_steps: template.next_steps.iter().map(|s| s.to_string()).collect(),
                follow_up_questions: template
                    .follow_up_questions
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                adjustments: Vec::new(),
            };
        }

        let mut table = ScoreTable::new(self.params.base_score);

        match context.student_level {
            StudentLevel::Beginner => table.bump_all(
                &[
                    (DirectInstruction, 3.0),
                    (WorkedExample, 2.0),
                    (Scaffolding, 2.0),
                    (Socratic, -2.0),
                    (ProblemBased, -1.0),
                ],
                "student level beginner",
            ),
            StudentLevel::Advanced => table.bump_all(
                &[
                    (Socratic, 3.0),
                    (ProblemBased, 2.0),
                    (DirectInstruction, -2.0),
                ],
                "student level advanced",
            ),
            StudentLevel::Intermediate => {}
        }

        match context.question_type {
            QuestionType::Factual => table.bump_all(
                &[
                    (DirectInstruction, 3.0),
                    (Narrative, 1.0),
                    (Socratic, -1.0),
                ],
                "question type factual",
            ),
            QuestionType::Procedural => table.bump_all(
                &[
                    (WorkedExample, 3.0),
                    (Scaffolding, 2.0),
                    (VisualDemo, 1.0),
                ],
                "question type procedural",
            ),
            QuestionType::Conceptual => table.bump_all(
                &[(Socratic, 2.0), (AnalogyBased, 2.0), (Narrative, 1.0)],
                "question type conceptual",
            ),
            QuestionType::Analytical => table.bump_all(
                &[(ProblemBased, 3.0), (Socratic, 2.0)],
                "question type analytical",
            ),
        }

        if context.confusion_level == ConfusionLevel::High {
            table.bump_all(
                &[
                    (DirectInstruction, 2.0),
                    (Scaffolding, 2.0),
                    (Socratic, -2.0),
                    (ProblemBased, -2.0),
                ],
                "high confusion",
            );
        }

        if context.previous_attempts > 2 {
            table.bump_all(
                &[(Narrative, 2.0), (AnalogyBased, 2.0), (VisualDemo, 1.0)],
                "repeated attempts",
            );
        }

        let subject = context.subject.to_lowercase();
        if subject.contains("math") || subject.contains("رياض") {
            table.bump_all(
                &[(WorkedExample, 2.0), (VisualDemo, 1.0)],
                "subject keyword math",
            );
        }
        if subject.contains("history") || subject.contains("تاريخ") {
            table.bump_all(
                &[(Narrative, 3.0), (ProblemBased, 1.0)],
                "subject keyword history",
            );
        }
        if subject.contains("programming") || subject.contains("برمج") {
            table.bump_all(
                &[(WorkedExample, 2.0), (Scaffolding, 2.0)],
                "subject keyword programming",
            );
        }

        if let Some(profile) = profile {
            if profile.confidence >= self.params.profile_confidence_gate {
                let channel = profile.preferences.dominant_channel();
                let source = format!("learner profile leans {}", channel.as_str());
                for method in channel.strategies() {
                    table.bump(*method, self.params.profile_channel_bonus, &source);
                }
            }
        }

        let (method, score, mut adjustments) = table.winner();
        adjustments.retain(|a| a.delta > 0.0);
        adjustments.sort_by(|a, b| {
            b.delta
                .partial_cmp(&a.delta)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let reasoning = if adjustments.is_empty() {
            format!(
                "'{}' selected on baseline priority; no context signal moved the score",
                method.as_str()
            )
        } else {
            let drivers: Vec<String> = adjustments
                .iter()
                .take(3)
                .map(|a| format!("{} (+{})", a.source, a.delta))
                .collect();
            format!("'{}' selected: {}", method.as_str(), drivers.join(", "))
        };

        let template = template_for(method);
        MethodologyRecommendation {
            method,
            score,
            confidence: (score / self.params.max_theoretical_score).clamp(0.0, 1.0),
            reasoning,
            next_steps: template.next_steps.iter().map(|s| s.to_string()).collect(),
            follow_up_questions: template
                .follow_up_questions
                .iter()
                .map(|s| s.to_string())
                .collect(),
            adjustments,
        }
    }
}

impl Default for MethodologyScorer {
    fn default() -> Self {
        Self::new(ScoringParams::default())
    }
}
