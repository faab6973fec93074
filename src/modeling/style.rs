//! Learning-style inference over a student's recent interactions.
//!
//! Interactions are partitioned into four non-exclusive modality buckets by
//! teaching-method tag; a bucket that outperforms the student's overall
//! success rate earns a proportionally higher preference. The reading score
//! is derived as the remainder after scaling the other three, which pins the
//! four preferences to an exact sum of 100 with no floating-point drift.

use crate::config::StyleParams;
use crate::types::{
    Interaction, LearningChannel, LearningStyleProfile, MethodologyPreference, Pace,
    StylePreferences,
};
use chrono::{TimeZone, Timelike, Utc};
use std::collections::{BTreeMap, HashSet};

pub struct StyleAnalyzer {
    params: StyleParams,
}

#[derive(Default)]
struct Bucket {
    count: u32,
    success_sum: f64,
}

impl Bucket {
    fn add(&mut self, success: f64) {
        self.count += 1;
        self.success_sum += success;
    }

    fn rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.success_sum / self.count as f64
        }
    }
}

/// Whether a method tag exercises the given channel. Tags can land in more
/// than one bucket.
fn tag_matches(channel: LearningChannel, tag: &str) -> bool {
    let t = tag.to_ascii_lowercase();
    match channel {
        LearningChannel::Visual => {
            t == "visual_demo" || t.contains("diagram") || t.contains("visual")
        }
        LearningChannel::Auditory => t == "narrative" || t == "socratic" || t.contains("audio"),
        LearningChannel::Kinesthetic => {
            t == "problem_based" || t == "scaffolding" || t.contains("interactive")
        }
        LearningChannel::Reading => {
            t == "direct_instruction"
                || t == "worked_example"
                || t.contains("text")
                || t.contains("reading")
        }
    }
}

impl StyleAnalyzer {
    pub fn new(params: StyleParams) -> Self {
        Self { params }
    }

    /// `interactions` must be ordered oldest to newest; only the most recent
    /// window is considered. Returns the neutral default profile whenever
    /// fewer than the minimum interactions exist.
    pub fn analyze(
        &self,
        student_id: &str,
        interactions: &[Interaction],
        now_ms: i64,
    ) -> LearningStyleProfile {
        let start = interactions.len().saturating_sub(self.params.window);
        let window = &interactions[start..];

        if window.len() < self.params.min_interactions {
            return LearningStyleProfile::neutral(student_id, now_ms);
        }

        let overall_rate =
            window.iter().map(|r| r.success).sum::<f64>() / window.len() as f64;

        let mut channel_buckets: [Bucket; 4] = Default::default();
        for record in window {
            for (i, channel) in LearningChannel::ALL.iter().enumerate() {
                if tag_matches(*channel, &record.methodology) {
                    channel_buckets[i].add(record.success);
                }
            }
        }

        let raw: Vec<f64> = channel_buckets
            .iter()
            .map(|bucket| {
                if bucket.count == 0 || overall_rate <= 0.0 {
                    25.0
                } else {
                    (bucket.rate() / overall_rate * 25.0).clamp(0.0, 100.0)
                }
            })
            .collect();

        let preferences = normalize(raw[0], raw[1], raw[2], raw[3]);

        LearningStyleProfile {
            student_id: student_id.to_string(),
            preferences,
            confidence: self.confidence(window),
            optimal_pace: self.optimal_pace(window),
            ranked_methodologies: self.ranked_methodologies(window),
            recommendations: self.recommendations(window),
            sample_count: window.len() as u32,
            updated_at_ms: now_ms,
        }
    }

    /// Pace bucket with the best success rate. Ties favor medium, then fast:
    /// a rate must strictly beat the incumbent to take over.
    fn optimal_pace(&self, window: &[Interaction]) -> Pace {
        let mut slow = Bucket::default();
        let mut medium = Bucket::default();
        let mut fast = Bucket::default();
        for record in window {
            let t = record.response_time_seconds;
            if t > self.params.slow_cutoff_seconds {
                slow.add(record.success);
            } else if t < self.params.fast_cutoff_seconds {
                fast.add(record.success);
            } else {
                medium.add(record.success);
            }
        }

        let mut best = Pace::Medium;
        let mut best_rate = medium.rate();
        if fast.rate() > best_rate {
            best = Pace::Fast;
            best_rate = fast.rate();
        }
        if slow.rate() > best_rate {
            best = Pace::Slow;
        }
        best
    }

    fn confidence(&self, window: &[Interaction]) -> f64 {
        let n = window.len() as f64;
        let volume = (n / self.params.volume_cap).min(1.0);

        let min_ts = window.iter().map(|r| r.timestamp_ms).min().unwrap_or(0);
        let max_ts = window.iter().map(|r| r.timestamp_ms).max().unwrap_or(0);
        let span_days = (max_ts - min_ts) as f64 / 86_400_000.0;
        let span = (span_days / self.params.span_cap_days).min(1.0);

        let distinct: HashSet<String> = window
            .iter()
            .map(|r| r.methodology.to_ascii_lowercase())
            .collect();
        let variety = (distinct.len() as f64 / self.params.distinct_cap).min(1.0);

        self.params.volume_weight * volume
            + self.params.span_weight * span
            + self.params.distinct_weight * variety
    }

    fn ranked_methodologies(&self, window: &[Interaction]) -> Vec<MethodologyPreference> {
        let mut by_tag: BTreeMap<String, Bucket> = BTreeMap::new();
        for record in window {
            by_tag
                .entry(record.methodology.to_ascii_lowercase())
                .or_default()
                .add(record.success);
        }
        let mut ranked: Vec<MethodologyPreference> = by_tag
            .into_iter()
            .map(|(methodology, bucket)| MethodologyPreference {
                success_rate: bucket.rate(),
                attempts: bucket.count,
                methodology,
            })
            .collect();
        // BTreeMap iteration already sorted tags, so equal rates stay in
        // lexicographic order after the stable sort.
        ranked.sort_by(|a, b| {
            b.success_rate
                .partial_cmp(&a.success_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    fn recommendations(&self, window: &[Interaction]) -> Vec<String> {
        let mut out = Vec::new();

        let mut by_hour: BTreeMap<u32, Bucket> = BTreeMap::new();
        for record in window {
            if let Some(ts) = Utc.timestamp_millis_opt(record.timestamp_ms).single() {
                by_hour.entry(ts.hour()).or_default().add(record.success);
            }
        }
        for (hour, bucket) in &by_hour {
            let rate = bucket.rate();
            if rate < self.params.low_engagement_threshold {
                out.push(format!(
                    "Success rate around {hour:02}:00 UTC is {:.0}%; schedule lighter review in that hour",
                    rate * 100.0
                ));
            }
        }

        let mut by_concept: BTreeMap<String, Bucket> = BTreeMap::new();
        for record in window {
            by_concept
                .entry(record.concept.clone())
                .or_default()
                .add(record.success);
        }
        for (concept, bucket) in &by_concept {
            let rate = bucket.rate();
            if rate < self.params.difficult_concept_threshold {
                out.push(format!(
                    "Concept '{concept}' sits at {:.0}% success; plan focused review",
                    rate * 100.0
                ));
            }
        }

        if let Some(top) = self.ranked_methodologies(window).first() {
            out.push(format!(
                "'{}' is the strongest method at {:.0}% success; prefer it for new material",
                top.methodology,
                top.success_rate * 100.0
            ));
        }

        out
    }
}

impl Default for StyleAnalyzer {
    fn default() -> Self {
        Self::new(StyleParams::default())
    }
}

/// Scale visual/auditory/kinesthetic onto the 100-point scale and derive
/// reading as the remainder so the four always sum to exactly 100.
fn normalize(visual: f64, auditory: f64, kinesthetic: f64, reading: f64) -> StylePreferences {
    let total = visual + auditory + kinesthetic + reading;
    if total <= 0.0 {
        return StylePreferences::default();
    }
    let scale = 100.0 / total;
    let v = visual * scale;
    let a = auditory * scale;
    let k = kinesthetic * scale;
    StylePreferences {
        visual: v,
        auditory: a,
        kinesthetic: k,
        reading: (100.0 - (v + a + k)).max(0.0),
    }
}
