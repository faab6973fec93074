//! Repository seams toward the external storage collaborator, plus
//! in-memory implementations used by tests and embedders.

use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::RepositoryError;
use crate::types::{ConceptMastery, Interaction, LearningStyleProfile};

/// Read side of the append-only interaction log. All listing methods return
/// records in chronological order, oldest first.
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn append(&self, interaction: Interaction) -> Result<(), RepositoryError>;

    /// Full history for one (student, concept).
    async fn history_for_concept(
        &self,
        student_id: &str,
        concept: &str,
    ) -> Result<Vec<Interaction>, RepositoryError>;

    /// The most recent `limit` records for a student across all concepts.
    async fn recent_for_student(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Interaction>, RepositoryError>;

    /// Distinct (concept, subject) pairs the student has touched, sorted.
    async fn concepts_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<(String, String)>, RepositoryError>;
}

/// Write side for the profile artifacts the engine owns.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn student_exists(&self, student_id: &str) -> Result<bool, RepositoryError>;

    async fn student_ids(&self) -> Result<Vec<String>, RepositoryError>;

    async fn load_mastery(
        &self,
        student_id: &str,
        concept: &str,
    ) -> Result<Option<ConceptMastery>, RepositoryError>;

    /// Version-checked upsert. `expected_version` of `None` asserts the
    /// record does not exist yet; otherwise the stored version must match,
    /// or `RepositoryError::VersionConflict` is returned and the caller
    /// reloads and retries.
    async fn upsert_mastery(
        &self,
        record: &ConceptMastery,
        expected_version: Option<i64>,
    ) -> Result<(), RepositoryError>;

    async fn load_style(
        &self,
        student_id: &str,
    ) -> Result<Option<LearningStyleProfile>, RepositoryError>;

    async fn save_style(&self, profile: &LearningStyleProfile) -> Result<(), RepositoryError>;
}

/// In-memory profile store. Students must be registered before the engine
/// will create profiles for them, mirroring the backing user table of the
/// real storage collaborator.
#[derive(Default)]
pub struct MemoryProfileStore {
    students: RwLock<HashSet<String>>,
    mastery: RwLock<HashMap<(String, String), ConceptMastery>>,
    styles: RwLock<HashMap<String, LearningStyleProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_student(&self, student_id: impl Into<String>) {
        self.students.write().await.insert(student_id.into());
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileStore {
    async fn student_exists(&self, student_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.students.read().await.contains(student_id))
    }

    async fn student_ids(&self) -> Result<Vec<String>, RepositoryError> {
        let mut ids: Vec<String> = self.students.read().await.iter().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn load_mastery(
        &self,
        student_id: &str,
        concept: &str,
    ) -> Result<Option<ConceptMastery>, RepositoryError> {
        let key = (student_id.to_string(), concept.to_string());
        Ok(self.mastery.read().await.get(&key).cloned())
    }

    async fn upsert_mastery(
        &self,
        record: &ConceptMastery,
        expected_version: Option<i64>,
    ) -> Result<(), RepositoryError> {
        let key = (record.student_id.clone(), record.concept.clone());
        let mut map = self.mastery.write().await;
        let found = map.get(&key).map(|r| r.version);
        match (expected_version, found) {
            (None, None) => {
                map.insert(key, record.clone());
                Ok(())
            }
            (Some(expected), Some(found)) if expected == found => {
                map.insert(key, record.clone());
                Ok(())
            }
            (expected, found) => Err(RepositoryError::VersionConflict {
                key: format!("{}:{}", record.student_id, record.concept),
                expected: expected.unwrap_or(-1),
                found: found.unwrap_or(-1),
            }),
        }
    }

    async fn load_style(
        &self,
        student_id: &str,
    ) -> Result<Option<LearningStyleProfile>, RepositoryError> {
        Ok(self.styles.read().await.get(student_id).cloned())
    }

    async fn save_style(&self, profile: &LearningStyleProfile) -> Result<(), RepositoryError> {
        self.styles
            .write()
            .await
            .insert(profile.student_id.clone(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mastery(version: i64) -> ConceptMastery {
        ConceptMastery {
            student_id: "s1".into(),
            concept: "fractions".into(),
            subject: "math".into(),
            mastery_level: 40,
            attempts_count: 4,
            success_rate: 0.5,
            last_practiced_ms: 0,
            estimated_minutes_to_mastery: -1,
            version,
        }
    }

    #[tokio::test]
    async fn versioned_upsert_detects_conflicts() {
        let store = MemoryProfileStore::new();
        store.register_student("s1").await;

        store.upsert_mastery(&mastery(1), None).await.unwrap();
        // Stale expectation: someone else already wrote version 1.
        let err = store.upsert_mastery(&mastery(2), None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::VersionConflict { .. }));

        store.upsert_mastery(&mastery(2), Some(1)).await.unwrap();
        let loaded = store.load_mastery("s1", "fractions").await.unwrap().unwrap();
        assert_eq!(loaded.version, 2);
    }
}
