//! Capability store error types.

use thiserror::Error;

/// Capability store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this is the persistence-layer "no such row" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<agora_core::Error> for StoreError {
    fn from(e: agora_core::Error) -> Self {
        match e {
            agora_core::Error::InvalidIdentifier(name) => StoreError::InvalidIdentifier(name),
            agora_core::Error::Config(msg) => StoreError::Config(msg),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Config(e.to_string())
    }
}

/// Result type for capability store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
