//! SQL dialect support.
//!
//! Engines differ in a few statements the query builder emits. This module
//! provides a trait for that dialect-specific behaviour.

mod generic;
mod sqlite;

pub use generic::GenericDialect;
pub use sqlite::SqliteDialect;

/// Trait for SQL dialect-specific behaviour.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the LIMIT written when only an OFFSET was requested.
    ///
    /// Some engines reject a bare OFFSET, so the builder pairs it with the
    /// largest row count the engine accepts.
    fn max_limit(&self) -> i64 {
        i64::MAX
    }

    /// Returns the statement that removes every row of `table`.
    fn truncate_table(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {table}")
    }
}
