use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryParams {
    /// Most recent interactions considered per (student, concept).
    pub window: usize,
    /// Exponential decay applied per step away from the newest record.
    pub decay: f64,
    pub success_weight: f64,
    pub consistency_weight: f64,
}

impl Default for MasteryParams {
    fn default() -> Self {
        Self {
            window: 10,
            decay: 0.9,
            success_weight: 0.7,
            consistency_weight: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleParams {
    /// Most recent interactions considered per student.
    pub window: usize,
    /// Below this count the analyzer short-circuits to the neutral profile.
    pub min_interactions: usize,
    pub default_confidence: f64,
    pub volume_cap: f64,
    pub volume_weight: f64,
    pub span_cap_days: f64,
    pub span_weight: f64,
    pub distinct_cap: f64,
    pub distinct_weight: f64,
    /// Response-time boundaries (seconds) for the pace buckets.
    pub fast_cutoff_seconds: f64,
    pub slow_cutoff_seconds: f64,
    pub low_engagement_threshold: f64,
    pub difficult_concept_threshold: f64,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            window: 100,
            min_interactions: 5,
            default_confidence: 0.1,
            volume_cap: 50.0,
            volume_weight: 0.4,
            span_cap_days: 30.0,
            span_weight: 0.3,
            distinct_cap: 8.0,
            distinct_weight: 0.3,
            fast_cutoff_seconds: 30.0,
            slow_cutoff_seconds: 120.0,
            low_engagement_threshold: 0.6,
            difficult_concept_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressParams {
    /// Records compared as two triads when classifying the trend.
    pub trend_window: usize,
    pub trend_delta: f64,
    pub velocity_min_records: usize,
    pub retention_min_records: usize,
    pub retention_sample: usize,
    /// Floor applied to the initial-learning average before dividing.
    pub retention_floor: f64,
    pub retention_default: f64,
    pub difficulty_threshold: f64,
    pub mastered_threshold: u8,
}

impl Default for ProgressParams {
    fn default() -> Self {
        Self {
            trend_window: 6,
            trend_delta: 0.1,
            velocity_min_records: 5,
            retention_min_records: 10,
            retention_sample: 5,
            retention_floor: 0.1,
            retention_default: 0.5,
            difficulty_threshold: 0.6,
            mastered_threshold: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringParams {
    pub base_score: f64,
    /// Profile-derived channel bonus only applies at or above this confidence.
    pub profile_confidence_gate: f64,
    pub profile_channel_bonus: f64,
    /// Denominator used to normalize the winning score into a confidence.
    pub max_theoretical_score: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            base_score: 5.0,
            profile_confidence_gate: 0.3,
            profile_channel_bonus: 1.0,
            max_theoretical_score: 16.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheParams {
    pub capacity: usize,
    pub ttl_seconds: u64,
}

impl Default for CacheParams {
    fn default() -> Self {
        Self {
            capacity: 4096,
            ttl_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryParams {
    /// Attempts at a version-checked upsert before giving up.
    pub upsert_attempts: u32,
}

impl Default for RetryParams {
    fn default() -> Self {
        Self { upsert_attempts: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoreConfig {
    pub mastery: MasteryParams,
    pub style: StyleParams,
    pub progress: ProgressParams,
    pub scoring: ScoringParams,
    pub cache: CacheParams,
    pub retry: RetryParams,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DARSAK_MASTERY_WINDOW") {
            if let Ok(parsed) = val.parse() {
                config.mastery.window = parsed;
            }
        }
        if let Ok(val) = std::env::var("DARSAK_STYLE_WINDOW") {
            if let Ok(parsed) = val.parse() {
                config.style.window = parsed;
            }
        }
        if let Ok(val) = std::env::var("DARSAK_CACHE_TTL_SECONDS") {
            if let Ok(parsed) = val.parse() {
                config.cache.ttl_seconds = parsed;
            }
        }
        if let Ok(val) = std::env::var("DARSAK_CACHE_CAPACITY") {
            if let Ok(parsed) = val.parse() {
                config.cache.capacity = parsed;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = CoreConfig::default();
        assert_eq!(config.mastery.window, 10);
        assert_eq!(config.mastery.decay, 0.9);
        assert_eq!(config.style.window, 100);
        assert_eq!(config.style.min_interactions, 5);
        assert_eq!(config.progress.trend_window, 6);
        assert_eq!(config.progress.retention_default, 0.5);
        assert_eq!(config.scoring.base_score, 5.0);
    }
}
