//! Error types for the SQLite driver.

use thiserror::Error;

/// Errors raised while opening a SQLite handle.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// The blocking runtime could not be started.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Result type alias for driver setup.
pub type Result<T> = std::result::Result<T, SqliteError>;
