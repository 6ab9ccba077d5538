//! Errors raised while declaring a query.

use thiserror::Error;

/// Errors raised synchronously by condition, order and limit builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A NULL value was paired with an operator other than `=`, `<>`, `!=`.
    #[error("operator '{operator}' cannot be compared against NULL")]
    InvalidOperatorValue {
        /// The offending operator as written by the caller.
        operator: String,
    },

    /// The operator is not on the allow-list.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// The sort direction is neither `asc` nor `desc`.
    #[error("unsupported order direction: {0}")]
    UnsupportedDirection(String),
}

/// Result type alias for query declaration.
pub type Result<T> = std::result::Result<T, QueryError>;
