//! Error types raised by repository implementations.

use gotvalis_core::EntityId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("entity repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("no stored record for entity {0}")]
    MissingEntity(EntityId),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
