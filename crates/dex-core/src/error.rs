/// Failure of a single document-store call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store operation timed out")]
    Timeout,
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("failed to decode document: {0}")]
    Decode(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Outcome kinds surfaced to callers of the query layer.
#[derive(Debug, thiserror::Error)]
pub enum DexError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, DexError>;
