use crate::config::MasteryParams;
use crate::types::Interaction;

/// Output of one mastery estimation pass over a concept window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasteryEstimate {
    /// Always in [0,100].
    pub mastery: u8,
    /// 0 with fewer than two samples.
    pub consistency: f64,
    pub weighted_success: f64,
    pub samples: usize,
}

impl MasteryEstimate {
    pub const EMPTY: MasteryEstimate = MasteryEstimate {
        mastery: 0,
        consistency: 0.0,
        weighted_success: 0.0,
        samples: 0,
    };
}

/// Recency-weighted mastery over the most recent interactions for one
/// (student, concept). Recent performance dominates, but single lucky or
/// unlucky answers cannot swing the score without corroboration from the
/// consistency term.
pub struct MasteryEstimator {
    params: MasteryParams,
}

impl MasteryEstimator {
    pub fn new(params: MasteryParams) -> Self {
        Self { params }
    }

    /// `recent` must be ordered newest first; anything beyond the configured
    /// window is ignored. Never panics; degenerate input yields the
    /// documented zero estimate, never NaN.
    pub fn estimate(&self, recent: &[Interaction]) -> MasteryEstimate {
        let window = &recent[..recent.len().min(self.params.window)];
        // Empty and all-zero windows are degenerate: they resolve to the
        // zero estimate outright, not to a consistency-only score.
        if window.is_empty() || window.iter().all(|r| r.success == 0.0) {
            return MasteryEstimate {
                samples: window.len(),
                ..MasteryEstimate::EMPTY
            };
        }

        let mut weight = 1.0;
        let mut weight_sum = 0.0;
        let mut weighted = 0.0;
        for record in window {
            weighted += record.success * weight;
            weight_sum += weight;
            weight *= self.params.decay;
        }
        let avg_success = if weight_sum > 0.0 {
            weighted / weight_sum
        } else {
            0.0
        };

        let consistency = if window.len() >= 2 {
            let mean = window.iter().map(|r| r.success).sum::<f64>() / window.len() as f64;
            let variance = window
                .iter()
                .map(|r| (r.success - mean).powi(2))
                .sum::<f64>()
                / window.len() as f64;
            (1.0 - variance.sqrt()).max(0.0)
        } else {
            0.0
        };

        let raw = 100.0
            * (self.params.success_weight * avg_success
                + self.params.consistency_weight * consistency);
        let mastery = raw.round().clamp(0.0, 100.0) as u8;

        MasteryEstimate {
            mastery,
            consistency,
            weighted_success: avg_success,
            samples: window.len(),
        }
    }
}

impl Default for MasteryEstimator {
    fn default() -> Self {
        Self::new(MasteryParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(success: f64) -> Interaction {
        Interaction {
            id: String::new(),
            student_id: "s1".into(),
            session_id: "sess".into(),
            concept: "fractions".into(),
            subject: "math".into(),
            methodology: "worked_example".into(),
            success,
            difficulty: 5,
            response_time_seconds: 40.0,
            timestamp_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn empty_window_is_zero() {
        let est = MasteryEstimator::default().estimate(&[]);
        assert_eq!(est, MasteryEstimate::EMPTY);
    }

    #[test]
    fn single_record_has_no_consistency() {
        let est = MasteryEstimator::default().estimate(&[record(1.0)]);
        // 100 * 0.7 * 1.0, consistency term requires two samples.
        assert_eq!(est.mastery, 70);
        assert_eq!(est.consistency, 0.0);
    }

    #[test]
    fn two_record_hand_computed() {
        // newest 1.0 (w=1.0), then 0.5 (w=0.9):
        // avg = 1.45/1.9, variance of [1.0, 0.5] = 0.0625, consistency = 0.75
        // mastery = round(100 * (0.7 * 0.76316 + 0.3 * 0.75)) = 76
        let est = MasteryEstimator::default().estimate(&[record(1.0), record(0.5)]);
        assert_eq!(est.mastery, 76);
        assert!((est.consistency - 0.75).abs() < 1e-12);
    }

    #[test]
    fn perfect_streak_is_full_mastery() {
        let window: Vec<_> = (0..10).map(|_| record(1.0)).collect();
        let est = MasteryEstimator::default().estimate(&window);
        assert_eq!(est.mastery, 100);
        assert_eq!(est.consistency, 1.0);
    }

    #[test]
    fn all_zero_resolves_to_zero() {
        // Constant zeros have no variance, but the degenerate-input rule
        // wins over the consistency term.
        let window: Vec<_> = (0..10).map(|_| record(0.0)).collect();
        let est = MasteryEstimator::default().estimate(&window);
        assert_eq!(est.mastery, 0);
        assert_eq!(est.consistency, 0.0);
        let lone = MasteryEstimator::default().estimate(&[record(0.0)]);
        assert_eq!(lone.mastery, 0);
    }

    #[test]
    fn window_truncates_old_records() {
        // 10 failures followed (newest-first) means an 11th old success
        // must not register at all.
        let mut window: Vec<_> = (0..10).map(|_| record(0.2)).collect();
        window.push(record(1.0));
        let est = MasteryEstimator::default().estimate(&window);
        assert_eq!(est.samples, 10);
        let without: Vec<_> = (0..10).map(|_| record(0.2)).collect();
        assert_eq!(est, MasteryEstimator::default().estimate(&without));
    }

    #[test]
    fn newest_record_dominates() {
        let rising = MasteryEstimator::default().estimate(&[record(1.0), record(0.2)]);
        let falling = MasteryEstimator::default().estimate(&[record(0.2), record(1.0)]);
        assert!(rising.mastery > falling.mastery);
    }
}
