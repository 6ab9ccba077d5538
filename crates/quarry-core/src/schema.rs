//! Column descriptions discovered at runtime.

use serde::Serialize;

/// One column of a table, as reported by the engine's introspection.
///
/// Field meanings follow MySQL's `DESCRIBE`: `key` is `"PRI"` for primary
/// key columns and empty otherwise, `extra` carries engine notes such as
/// `"auto_increment"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnDescription {
    /// Column name.
    pub name: String,
    /// Declared type, as text.
    pub data_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Key marker.
    pub key: String,
    /// Default value expression, if any.
    pub default: Option<String>,
    /// Extra engine information.
    pub extra: String,
}

impl ColumnDescription {
    /// Returns whether this column is (part of) the primary key.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.key == "PRI"
    }
}
