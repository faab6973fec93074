use crate::config::ProgressParams;
use crate::modeling::mastery::MasteryEstimator;
use crate::types::{DifficultyArea, Interaction, ProgressReport, Trend};
use std::collections::BTreeMap;

pub struct ProgressTracker {
    params: ProgressParams,
}

impl ProgressTracker {
    pub fn new(params: ProgressParams) -> Self {
        Self { params }
    }

    /// Classifies the trend from the last six records (recent triad vs the
    /// triad before it). Fewer than six records is insufficient signal and
    /// reports `Stable` by definition, not as a computed result.
    pub fn trend(&self, history: &[Interaction]) -> Trend {
        if history.len() < self.params.trend_window {
            return Trend::Stable;
        }
        let tail = &history[history.len() - self.params.trend_window..];
        let half = self.params.trend_window / 2;
        let previous = mean_success(&tail[..half]);
        let recent = mean_success(&tail[half..]);
        let delta = recent - previous;

        if delta > self.params.trend_delta {
            Trend::Improving
        } else if delta < -self.params.trend_delta {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    /// Mean of period-to-period success deltas over three roughly equal
    /// chronological slices. Positive means improving. Requires at least
    /// five records, else 0.
    pub fn learning_velocity(&self, history: &[Interaction]) -> f64 {
        let n = history.len();
        if n < self.params.velocity_min_records {
            return 0.0;
        }
        let bounds = [0, n / 3, 2 * n / 3, n];
        let mut period_means = [0.0; 3];
        for (i, mean) in period_means.iter_mut().enumerate() {
            *mean = mean_success(&history[bounds[i]..bounds[i + 1]]);
        }
        ((period_means[1] - period_means[0]) + (period_means[2] - period_means[1])) / 2.0
    }

    /// Recent-review average over initial-learning average, clamped to
    /// [0,1]. Below ten records the answer is the 0.5 "unknown" default,
    /// which deliberately differs from a measured zero retention.
    pub fn retention_rate(&self, history: &[Interaction]) -> f64 {
        if history.len() < self.params.retention_min_records {
            return self.params.retention_default;
        }
        let sample = self.params.retention_sample;
        let initial = mean_success(&history[..sample]);
        let review = mean_success(&history[history.len() - sample..]);
        (review / initial.max(self.params.retention_floor)).clamp(0.0, 1.0)
    }

    /// Difficulty levels whose average success falls below the threshold,
    /// ascending by level.
    pub fn difficulty_areas(&self, history: &[Interaction]) -> Vec<DifficultyArea> {
        let mut by_level: BTreeMap<u8, (u32, f64)> = BTreeMap::new();
        for record in history {
            let entry = by_level.entry(record.difficulty).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += record.success;
        }
        by_level
            .into_iter()
            .filter_map(|(difficulty, (attempts, sum))| {
                let success_rate = sum / attempts as f64;
                (success_rate < self.params.difficulty_threshold).then_some(DifficultyArea {
                    difficulty,
                    success_rate,
                    attempts,
                })
            })
            .collect()
    }

    /// Hours until the mastered threshold. 0 when already mastered; the -1
    /// sentinel when velocity is non-positive, which callers must read as
    /// "cannot estimate", never "zero time".
    pub fn time_to_mastery_hours(&self, mastery: u8, velocity: f64) -> i64 {
        let target = self.params.mastered_threshold;
        if mastery >= target {
            return 0;
        }
        if velocity <= 0.0 {
            return -1;
        }
        let hours = ((target - mastery) as f64 / velocity * 2.0).ceil() as i64;
        hours.max(1)
    }

    pub fn next_steps(&self, mastery: u8) -> Vec<String> {
        if mastery < 30 {
            vec![
                "Review the foundational definitions before new exercises".to_string(),
                "Work through guided examples with full solutions visible".to_string(),
            ]
        } else if mastery < 70 {
            vec![
                "Practice intermediate problems without hints".to_string(),
                "Revisit the mistakes from the last few sessions".to_string(),
            ]
        } else if mastery < 90 {
            vec![
                "Apply the concept to multi-step or unfamiliar problems".to_string(),
                "Time-box exercises to build fluency".to_string(),
            ]
        } else {
            vec![
                "Explain the concept back in your own words".to_string(),
                "Move on to the next concept in the track".to_string(),
            ]
        }
    }

    /// Full per-concept report. `history` must be ordered oldest to newest.
    pub fn report(
        &self,
        concept: &str,
        history: &[Interaction],
        estimator: &MasteryEstimator,
    ) -> ProgressReport {
        let newest_first: Vec<Interaction> = history.iter().rev().cloned().collect();
        let estimate = estimator.estimate(&newest_first);
        let velocity = self.learning_velocity(history);

        ProgressReport {
            concept_name: concept.to_string(),
            current_mastery: estimate.mastery,
            learning_velocity: velocity,
            retention_rate: self.retention_rate(history),
            trend: self.trend(history),
            difficulty_areas: self.difficulty_areas(history),
            next_steps: self.next_steps(estimate.mastery),
            estimated_hours_to_mastery: self.time_to_mastery_hours(estimate.mastery, velocity),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(ProgressParams::default())
    }
}

fn mean_success(records: &[Interaction]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| r.success).sum::<f64>() / records.len() as f64
}
