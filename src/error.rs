use thiserror::Error;

/// Storage-boundary failures surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A version-checked upsert observed a concurrent write. Callers retry
    /// by reloading the record.
    #[error("version conflict on {key}: expected {expected}, found {found}")]
    VersionConflict {
        key: String,
        expected: i64,
        found: i64,
    },
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    /// No backing student record exists where a profile must be created.
    /// This is the only condition surfaced as a hard error; data sparsity
    /// always resolves to documented defaults instead.
    #[error("no backing student record for '{0}'")]
    UnknownStudent(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
