//! Error types for the ORM.

use quarry_core::QueryError;
use thiserror::Error;

use crate::connection::BoxError;

/// ORM-specific errors.
#[derive(Debug, Error)]
pub enum OrmError {
    /// A condition, order or limit was declared with invalid arguments.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A row was persisted or removed without a primary key value.
    #[error("row has no value for primary key '{key}'")]
    MissingPrimaryKey {
        /// Name of the primary key column.
        key: String,
    },

    /// A single-row accessor matched nothing.
    #[error("row not found")]
    RowNotFound,

    /// A non-empty write payload named no column of the described table.
    #[error("table '{table}' has none of the columns {}", columns.join(", "))]
    UnknownColumns {
        /// Physical table name.
        table: String,
        /// Payload keys that were rejected.
        columns: Vec<String>,
    },

    /// Whatever the database handle reported, passed through unchanged.
    #[error("database error: {0}")]
    Database(#[source] BoxError),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, OrmError>;
