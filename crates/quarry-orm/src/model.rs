//! Row models and the trait binding a Rust type to a table.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use quarry_core::{Attributes, ColumnDescription, Dialect, Filterable, SqlValue, ToSqlValue};

use crate::accessor::{Accessors, GetterInput};
use crate::builder::QueryBuilder;
use crate::connection::Connection;
use crate::error::{OrmError, Result};

/// Binds a Rust type to a table and its accessors.
///
/// Nothing is required: the table defaults to the type's own name, resolved
/// through the configured prefix, and the primary key defaults to `id`.
///
/// ```rust
/// use quarry_orm::{Accessors, Model, SqlValue};
///
/// struct Widget;
///
/// impl Model for Widget {
///     fn accessors(accessors: Accessors) -> Accessors {
///         accessors.getter("price", |input| match input.stored() {
///             Some(value) => value.as_f64().map_or(SqlValue::Null, |cents| SqlValue::Float(cents / 100.0)),
///             None => SqlValue::Null,
///         })
///     }
/// }
///
/// assert_eq!(Widget::primary_key(), "id");
/// assert!(Widget::table().is_none());
/// ```
pub trait Model: 'static {
    /// Explicit table identifier. `None` resolves the type name.
    fn table() -> Option<&'static str> {
        None
    }

    /// Primary key column.
    fn primary_key() -> &'static str {
        "id"
    }

    /// Registers the model's getters and setters.
    fn accessors(accessors: Accessors) -> Accessors {
        accessors
    }
}

/// Everything the rows of one table share.
pub(crate) struct TableContext {
    pub(crate) connection: Arc<dyn Connection>,
    pub(crate) table: String,
    pub(crate) primary_key: String,
    pub(crate) columns: Vec<ColumnDescription>,
    pub(crate) accessors: Accessors,
}

impl TableContext {
    /// Describes `table` once. A failed description leaves the column list
    /// empty, which disables column filtering on writes.
    pub(crate) fn load(
        connection: Arc<dyn Connection>,
        table: String,
        primary_key: String,
        accessors: Accessors,
    ) -> Self {
        let columns = match connection.describe(&table) {
            Ok(columns) => columns,
            Err(err) => {
                warn!(table = %table, error = %err, "could not describe table");
                Vec::new()
            }
        };
        debug!(table = %table, columns = columns.len(), "table described");
        Self {
            connection,
            table,
            primary_key,
            columns,
            accessors,
        }
    }

    pub(crate) fn dialect(&self) -> &dyn Dialect {
        self.connection.dialect()
    }

    pub(crate) fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

impl fmt::Debug for TableContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableContext")
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("columns", &self.columns)
            .field("accessors", &self.accessors)
            .finish_non_exhaustive()
    }
}

/// One fetched row with its attributes and a route back to its table.
///
/// Reads and writes go through the table's accessors. Persistence
/// operations scope themselves to this row's primary key.
#[derive(Clone)]
pub struct RowModel {
    context: Arc<TableContext>,
    attributes: Attributes,
}

impl RowModel {
    pub(crate) const fn new(context: Arc<TableContext>, attributes: Attributes) -> Self {
        Self {
            context,
            attributes,
        }
    }

    /// Returns the table this row belongs to.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.context.table
    }

    /// Returns the primary key column name.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.context.primary_key
    }

    /// Returns the raw attribute map.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Consumes the row, returning its raw attributes.
    #[must_use]
    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// Returns the stored value of `name`, bypassing getters.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&SqlValue> {
        self.attributes.get(name)
    }

    /// Returns whether `name` is stored or has a getter.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name) || self.context.accessors.has_getter(name)
    }

    /// Reads an attribute through its getter.
    ///
    /// A stored attribute with a getter yields the getter's transform of the
    /// stored value. A missing attribute with a getter yields whatever the
    /// getter computes from the row. Without a getter the raw value is
    /// returned, or `None` if the row has no such attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SqlValue> {
        let accessors = &self.context.accessors;
        match self.attributes.get(name) {
            Some(value) => accessors
                .get(name, GetterInput::Stored(value))
                .or_else(|| Some(value.clone())),
            None => accessors.get(name, GetterInput::Row(self)),
        }
    }

    /// Writes an attribute in memory.
    ///
    /// An attribute the row already has is routed through its setter when
    /// one exists; the setter may rewrite the whole map. Anything else is
    /// stored raw.
    pub fn set(&mut self, name: &str, value: impl ToSqlValue) {
        let value = value.to_sql_value();
        if self.attributes.contains_key(name) {
            let accessors = &self.context.accessors;
            let mut attributes = self.attributes.clone();
            if accessors.set(name, &mut attributes, value.clone()) {
                self.attributes = attributes;
                return;
            }
        }
        self.attributes.insert(name.to_string(), value);
    }

    /// Returns the primary key value.
    pub fn primary_key_value(&self) -> Result<SqlValue> {
        match self.attributes.get(&self.context.primary_key) {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => Err(OrmError::MissingPrimaryKey {
                key: self.context.primary_key.clone(),
            }),
        }
    }

    /// Writes every attribute back to this row.
    pub fn save(&mut self) -> Result<u64> {
        self.update(None)
    }

    /// Writes `values` (or, with `None`, every attribute) to this row and
    /// merges the columns actually written into the in-memory attributes.
    pub fn update(&mut self, values: Option<Attributes>) -> Result<u64> {
        let builder = self.scoped()?;
        let payload = values.unwrap_or_else(|| self.attributes.clone());
        let (affected, written) = builder.update_columns(&payload)?;
        self.attributes.extend(written);
        Ok(affected)
    }

    /// Deletes this row.
    pub fn delete(&self) -> Result<u64> {
        self.scoped()?.delete()
    }

    /// Reloads the attributes from the database.
    pub fn refresh(&mut self) -> Result<()> {
        let fresh = self.scoped()?.first()?.ok_or(OrmError::RowNotFound)?;
        self.attributes = fresh.attributes;
        Ok(())
    }

    /// Serializes the raw attributes as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.attributes)?)
    }

    /// A fresh builder restricted to this row's primary key.
    fn scoped(&self) -> Result<QueryBuilder> {
        let id = self.primary_key_value()?;
        Ok(QueryBuilder::from_context(Arc::clone(&self.context)).where_eq(&self.context.primary_key, id))
    }
}

impl fmt::Debug for RowModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowModel")
            .field("table", &self.context.table)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl PartialEq for RowModel {
    fn eq(&self, other: &Self) -> bool {
        self.context.table == other.context.table && self.attributes == other.attributes
    }
}

impl Serialize for RowModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}
