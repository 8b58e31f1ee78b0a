use conflux_compress::CompressError;

/// Errors from event store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failure reported by the storage backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// An operation ran past its time budget.
    #[error("store operation {operation} timed out")]
    Timeout { operation: String },

    /// A stored object name that does not follow the slot layout.
    #[error("malformed object path: {path}")]
    MalformedPath { path: String },

    /// Compression or decompression failure on stored content.
    #[error(transparent)]
    Compression(#[from] CompressError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Timeout for a named operation.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
