//! Append-only in-memory interaction log: the source of truth every
//! estimator reads from. Records are immutable once appended; nothing here
//! updates or deletes them.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::RepositoryError;
use crate::persistence::InteractionRepository;
use crate::types::Interaction;

#[derive(Default)]
pub struct InteractionLog {
    by_student: RwLock<HashMap<String, Vec<Interaction>>>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.by_student.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl InteractionRepository for InteractionLog {
    async fn append(&self, interaction: Interaction) -> Result<(), RepositoryError> {
        let mut map = self.by_student.write().await;
        let records = map.entry(interaction.student_id.clone()).or_default();
        // Appends normally arrive in timestamp order; a straggler is slotted
        // back so listing methods can stay chronological.
        let position = records
            .iter()
            .rposition(|r| r.timestamp_ms <= interaction.timestamp_ms)
            .map(|p| p + 1)
            .unwrap_or(0);
        records.insert(position, interaction);
        Ok(())
    }

    async fn history_for_concept(
        &self,
        student_id: &str,
        concept: &str,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let map = self.by_student.read().await;
        Ok(map
            .get(student_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.concept == concept)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn recent_for_student(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let map = self.by_student.read().await;
        Ok(map
            .get(student_id)
            .map(|records| {
                let start = records.len().saturating_sub(limit);
                records[start..].to_vec()
            })
            .unwrap_or_default())
    }

    async fn concepts_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<(String, String)>, RepositoryError> {
        let map = self.by_student.read().await;
        let mut pairs: Vec<(String, String)> = map
            .get(student_id)
            .map(|records| {
                records
                    .iter()
                    .map(|r| (r.concept.clone(), r.subject.clone()))
                    .collect()
            })
            .unwrap_or_default();
        pairs.sort();
        pairs.dedup();
        Ok(pairs)
    }
}
