//! SQLite dialect.

use super::Dialect;

/// SQLite has no TRUNCATE; an unqualified DELETE takes its place.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn truncate_table(&self, table: &str) -> String {
        format!("DELETE FROM {table}")
    }
}
