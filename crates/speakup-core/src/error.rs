use thiserror::Error;

/// Errors related to the core types of the edge service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("slug already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}
