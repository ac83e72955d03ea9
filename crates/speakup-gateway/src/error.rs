use speakup_core::StorageError;
use speakup_redirector::RedirectorError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failures while assembling the edge layer at startup.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid redirect table: {0}")]
    Table(#[from] RedirectorError),
    #[error("content store unavailable: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to open redirect log: {0}")]
    Io(#[from] std::io::Error),
}
