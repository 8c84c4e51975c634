/// Errors from backing index operations.
///
/// Every variant is a data-access failure from the dictionary's point of
/// view; dictionaries propagate them unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failure reported by the storage backend or its driver.
    #[error("backend error in index {index}: {reason}")]
    Backend { index: String, reason: String },

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("index {0} lock poisoned")]
    Poisoned(String),

    /// The index was opened on a factory that has since been shut down.
    #[error("index {0} is closed")]
    Closed(String),
}

/// Result alias for index operations.
pub type StoreResult<T> = Result<T, StoreError>;
