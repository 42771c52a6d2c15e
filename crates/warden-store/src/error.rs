use thiserror::Error;

/// Errors surfaced by persistence adapters.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store call timed out: {0}")]
    Timeout(String),

    #[error("serialization failure: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
