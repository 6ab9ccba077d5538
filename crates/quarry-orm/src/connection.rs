//! The database handle the query builder runs against.
//!
//! Driver crates (quarry-sqlite, etc.) implement [`Connection`]. The ORM
//! only assumes the handle is connected and valid; it neither pools nor
//! reconnects, and every call is one blocking round-trip.

use quarry_core::value::escape_literal;
use quarry_core::{Attributes, ColumnDescription, Dialect, GenericDialect, SqlValue};

/// Opaque error reported by a database handle.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for database handle calls.
pub type DbResult<T> = std::result::Result<T, BoxError>;

/// A connected, blocking database handle.
///
/// Statements arrive with `?` placeholders and their parameters in order.
pub trait Connection: Send + Sync {
    /// Describes the columns of `table`. A missing table yields an empty
    /// list rather than an error where the engine allows it.
    fn describe(&self, table: &str) -> DbResult<Vec<ColumnDescription>>;

    /// Runs a statement returning rows.
    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Attributes>>;

    /// Runs a statement and returns the number of affected rows.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<u64>;

    /// Runs a statement and returns the first column of its first row.
    fn query_scalar(&self, sql: &str, params: &[SqlValue]) -> DbResult<Option<SqlValue>> {
        let rows = self.query(sql, params)?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next().map(|(_, value)| value)))
    }

    /// Returns the identifier assigned by the most recent INSERT.
    fn last_insert_id(&self) -> i64;

    /// Runs an INSERT and returns the identifier it assigned.
    ///
    /// Drivers that report the rowid with the statement result should
    /// override this so concurrent callers cannot observe each other's ids.
    fn execute_insert(&self, sql: &str, params: &[SqlValue]) -> DbResult<i64> {
        self.execute(sql, params)?;
        Ok(self.last_insert_id())
    }

    /// Escapes a string literal body for inline rendering.
    fn escape(&self, text: &str) -> String {
        escape_literal(text)
    }

    /// Returns the SQL dialect of the engine.
    fn dialect(&self) -> &dyn Dialect {
        &GenericDialect
    }
}
