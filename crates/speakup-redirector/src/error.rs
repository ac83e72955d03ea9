use thiserror::Error;

/// Result type for redirect table construction.
pub type Result<T> = std::result::Result<T, RedirectorError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectorError {
    #[error("duplicate redirect source: {0}")]
    DuplicateSource(String),
    #[error("redirect source points to itself: {0}")]
    SelfRedirect(String),
    #[error("redirect cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    #[error("redirect path must start with '/': {0}")]
    RelativePath(String),
}
