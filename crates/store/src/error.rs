//! Record store error types.

use thiserror::Error;

/// Record store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub(crate) fn command_not_found(id: i32) -> Self {
        Self::NotFound(format!("command {id} not found"))
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
