//! The learner profile engine: sole writer of mastery records and style
//! profiles, orchestrating the three refresh cadences over the injected
//! repositories.
//!
//! - per interaction: validate, append to the log, invalidate caches, and
//!   optionally score a recommendation synchronously;
//! - medium term: recompute and upsert concept mastery, serialized per
//!   student with optimistic-version retries at the storage boundary;
//! - long term: recompute the learning-style profile wholesale from the
//!   bounded window. Idempotent, safe under at-least-once batch semantics.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::BoundedCache;
use crate::config::CoreConfig;
use crate::decision::{AdaptationRegistry, MethodologyScorer};
use crate::error::{CoreError, RepositoryError};
use crate::modeling::{MasteryEstimator, ProgressTracker, StyleAnalyzer};
use crate::persistence::{InteractionRepository, ProfileRepository};
use crate::types::{
    ConceptMastery, Interaction, LearningStyleProfile, MethodologyRecommendation, ProgressReport,
    Role, TeachingContext,
};

pub struct ProfileEngine {
    config: Arc<RwLock<CoreConfig>>,
    interactions: Arc<dyn InteractionRepository>,
    profiles: Arc<dyn ProfileRepository>,
    student_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    style_cache: BoundedCache<LearningStyleProfile>,
    mastery_cache: BoundedCache<ConceptMastery>,
    adaptation: AdaptationRegistry,
}

impl ProfileEngine {
    pub fn new(
        config: CoreConfig,
        interactions: Arc<dyn InteractionRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        let ttl = Duration::from_secs(config.cache.ttl_seconds);
        let capacity = config.cache.capacity;
        Self {
            config: Arc::new(RwLock::new(config)),
            interactions,
            profiles,
            student_locks: Mutex::new(HashMap::new()),
            style_cache: BoundedCache::new(capacity, ttl),
            mastery_cache: BoundedCache::new(capacity, ttl),
            adaptation: AdaptationRegistry::with_defaults(),
        }
    }

    pub async fn config(&self) -> CoreConfig {
        self.config.read().await.clone()
    }

    pub async fn set_config(&self, config: CoreConfig) {
        *self.config.write().await = config;
        info!("engine config replaced");
    }

    async fn ensure_student(&self, student_id: &str) -> Result<(), CoreError> {
        if self.profiles.student_exists(student_id).await? {
            Ok(())
        } else {
            Err(CoreError::UnknownStudent(student_id.to_string()))
        }
    }

    async fn student_lock(&self, student_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.student_locks.lock().await;
        locks
            .entry(student_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Per-interaction cadence: append one exchange to the log. The record
    /// is sanitized, given an id when missing, and downstream caches for
    /// the student are invalidated.
    pub async fn record_interaction(
        &self,
        interaction: Interaction,
    ) -> Result<Interaction, CoreError> {
        self.ensure_student(&interaction.student_id).await?;

        let mut record = interaction.sanitized();
        if record.id.is_empty() {
            record.id = uuid::Uuid::new_v4().to_string();
        }

        self.interactions.append(record.clone()).await?;
        self.style_cache.invalidate(&record.student_id);
        self.mastery_cache
            .invalidate(&mastery_key(&record.student_id, &record.concept));
        debug!(
            student_id = %record.student_id,
            concept = %record.concept,
            success = record.success,
            "interaction appended"
        );
        Ok(record)
    }

    /// Append plus an optional synchronous recommendation for the next
    /// answer, in one call, for the chat-turn path.
    pub async fn process_interaction(
        &self,
        interaction: Interaction,
        context: Option<&TeachingContext>,
    ) -> Result<(Interaction, Option<MethodologyRecommendation>), CoreError> {
        let student_id = interaction.student_id.clone();
        let record = self.record_interaction(interaction).await?;
        let recommendation = match context {
            Some(ctx) => Some(self.recommend(&student_id, ctx).await?),
            None => None,
        };
        Ok((record, recommendation))
    }

    /// Current style profile: cache, then store, then the neutral default.
    pub async fn style_profile(
        &self,
        student_id: &str,
    ) -> Result<LearningStyleProfile, CoreError> {
        self.ensure_student(student_id).await?;
        if let Some(profile) = self.style_cache.get(student_id) {
            return Ok(profile);
        }
        let profile = match self.profiles.load_style(student_id).await? {
            Some(profile) => profile,
            None => LearningStyleProfile::neutral(student_id, now_ms()),
        };
        self.style_cache.insert(student_id, profile.clone());
        Ok(profile)
    }

    pub async fn concept_mastery(
        &self,
        student_id: &str,
        concept: &str,
    ) -> Result<Option<ConceptMastery>, CoreError> {
        self.ensure_student(student_id).await?;
        let key = mastery_key(student_id, concept);
        if let Some(record) = self.mastery_cache.get(&key) {
            return Ok(Some(record));
        }
        let record = self.profiles.load_mastery(student_id, concept).await?;
        if let Some(ref record) = record {
            self.mastery_cache.insert(key, record.clone());
        }
        Ok(record)
    }

    /// Scores the eight strategies against the context and the student's
    /// profile. Pure given its inputs; the result is never cached.
    pub async fn recommend(
        &self,
        student_id: &str,
        context: &TeachingContext,
    ) -> Result<MethodologyRecommendation, CoreError> {
        let profile = self.style_profile(student_id).await?;
        let config = self.config.read().await;
        let scorer = MethodologyScorer::new(config.scoring.clone());
        Ok(scorer.recommend(context, Some(&profile)))
    }

    pub async fn recommend_for_role(
        &self,
        student_id: &str,
        context: &TeachingContext,
        role: Role,
    ) -> Result<MethodologyRecommendation, CoreError> {
        let recommendation = self.recommend(student_id, context).await?;
        Ok(self.adaptation.adapt_for(role, &recommendation))
    }

    /// Medium-term cadence for one concept: recompute the mastery record
    /// from the logged history and upsert it under the per-student lock.
    pub async fn refresh_concept_mastery(
        &self,
        student_id: &str,
        concept: &str,
    ) -> Result<ConceptMastery, CoreError> {
        self.ensure_student(student_id).await?;
        let lock = self.student_lock(student_id).await;
        let _guard = lock.lock().await;

        let history = self
            .interactions
            .history_for_concept(student_id, concept)
            .await?;
        let config = self.config.read().await.clone();

        let estimator = MasteryEstimator::new(config.mastery.clone());
        let tracker = ProgressTracker::new(config.progress.clone());

        let newest_first: Vec<Interaction> = history.iter().rev().cloned().collect();
        let estimate = estimator.estimate(&newest_first);
        let velocity = tracker.learning_velocity(&history);
        let hours = tracker.time_to_mastery_hours(estimate.mastery, velocity);
        let minutes = if hours > 0 { hours * 60 } else { hours };

        let subject = history
            .last()
            .map(|r| r.subject.clone())
            .unwrap_or_default();
        let success_rate = if history.is_empty() {
            0.0
        } else {
            history.iter().map(|r| r.success).sum::<f64>() / history.len() as f64
        };
        let last_practiced_ms = history.last().map(|r| r.timestamp_ms).unwrap_or(0);

        let mut attempts_left = config.retry.upsert_attempts.max(1);
        loop {
            let existing = self.profiles.load_mastery(student_id, concept).await?;
            let expected = existing.as_ref().map(|r| r.version);
            let record = ConceptMastery {
                student_id: student_id.to_string(),
                concept: concept.to_string(),
                subject: subject.clone(),
                mastery_level: estimate.mastery,
                attempts_count: history.len() as u32,
                success_rate,
                last_practiced_ms,
                estimated_minutes_to_mastery: minutes,
                version: expected.unwrap_or(0) + 1,
            };

            match self.profiles.upsert_mastery(&record, expected).await {
                Ok(()) => {
                    self.mastery_cache
                        .insert(mastery_key(student_id, concept), record.clone());
                    debug!(
                        student_id,
                        concept,
                        mastery = record.mastery_level,
                        attempts = record.attempts_count,
                        "concept mastery refreshed"
                    );
                    return Ok(record);
                }
                Err(RepositoryError::VersionConflict { .. }) if attempts_left > 1 => {
                    attempts_left -= 1;
                    warn!(student_id, concept, "mastery upsert conflicted, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Medium-term cadence for a whole student: every touched concept.
    pub async fn refresh_student_mastery(
        &self,
        student_id: &str,
    ) -> Result<Vec<ConceptMastery>, CoreError> {
        self.ensure_student(student_id).await?;
        let concepts = self.interactions.concepts_for_student(student_id).await?;
        let mut refreshed = Vec::with_capacity(concepts.len());
        for (concept, _subject) in concepts {
            refreshed.push(self.refresh_concept_mastery(student_id, &concept).await?);
        }
        Ok(refreshed)
    }

    /// Long-term cadence: wholesale recomputation of the style profile from
    /// the bounded recent window. Re-running is safe; the result depends
    /// only on the log contents.
    pub async fn refresh_learning_style(
        &self,
        student_id: &str,
    ) -> Result<LearningStyleProfile, CoreError> {
        self.ensure_student(student_id).await?;
        let config = self.config.read().await.clone();
        let window = self
            .interactions
            .recent_for_student(student_id, config.style.window)
            .await?;

        let analyzer = StyleAnalyzer::new(config.style.clone());
        let profile = analyzer.analyze(student_id, &window, now_ms());

        self.profiles.save_style(&profile).await?;
        self.style_cache.insert(student_id, profile.clone());
        info!(
            student_id,
            samples = profile.sample_count,
            confidence = profile.confidence,
            pace = profile.optimal_pace.as_str(),
            "learning style refreshed"
        );
        Ok(profile)
    }

    /// Batch entry point for the external job runner. Failures are logged
    /// and skipped so one bad student does not starve the rest; the job is
    /// safe to re-run.
    pub async fn refresh_all_learning_styles(&self) -> Result<usize, CoreError> {
        let students = self.profiles.student_ids().await?;
        // Refreshes for different students never contend, so fan out.
        let results = futures::future::join_all(
            students
                .iter()
                .map(|student_id| self.refresh_learning_style(student_id)),
        )
        .await;

        let mut refreshed = 0;
        for (student_id, result) in students.iter().zip(results) {
            match result {
                Ok(_) => refreshed += 1,
                Err(err) => {
                    warn!(student_id = %student_id, error = %err, "style refresh failed");
                }
            }
        }
        info!(refreshed, "long-term style refresh pass completed");
        Ok(refreshed)
    }

    /// Per-concept progress report over the full logged history.
    pub async fn progress_report(
        &self,
        student_id: &str,
        concept: &str,
    ) -> Result<ProgressReport, CoreError> {
        self.ensure_student(student_id).await?;
        let history = self
            .interactions
            .history_for_concept(student_id, concept)
            .await?;
        let config = self.config.read().await;
        let estimator = MasteryEstimator::new(config.mastery.clone());
        let tracker = ProgressTracker::new(config.progress.clone());
        Ok(tracker.report(concept, &history, &estimator))
    }
}

fn mastery_key(student_id: &str, concept: &str) -> String {
    format!("{student_id}:{concept}")
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
