//! The dynamic query builder.
//!
//! A [`QueryBuilder`] is bound to one table. Chaining methods consume and
//! return the builder; terminal methods borrow it, so a builder can be run
//! more than once and keeps the result of its last row fetch.

use std::sync::Arc;

use tracing::debug;

use quarry_core::{
    Attributes, Boolean, ColumnDescription, Direction, Filterable, Operand, Operator, Query, Render,
    SqlValue, Statement, TableResolver, ToSqlValue, WhereCondition,
};

use crate::accessor::Accessors;
use crate::collection::RowCollection;
use crate::connection::Connection;
use crate::error::{OrmError, Result};
use crate::model::{Model, RowModel, TableContext};

/// Default primary key column.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A chainable query against one table.
///
/// ```rust,ignore
/// let mut widgets = db.table("widgets")
///     .where_op("qty", ">", 5)?
///     .order_by("name")
///     .limit(2);
/// for row in &widgets.all()? {
///     if let Some(name) = row.get("name") {
///         println!("{name}");
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    context: Arc<TableContext>,
    query: Query,
    last: Option<RowCollection>,
}

impl QueryBuilder {
    /// Creates a builder for `identifier` (a table or type name), resolved
    /// through `resolver`, with the default primary key.
    pub fn new(connection: Arc<dyn Connection>, resolver: &TableResolver, identifier: &str) -> Self {
        Self::build(connection, resolver.resolve(identifier), DEFAULT_PRIMARY_KEY, Accessors::new())
    }

    /// Creates a builder for the table bound to `M`.
    pub fn for_model<M: Model>(connection: Arc<dyn Connection>, resolver: &TableResolver) -> Self {
        let table = M::table().map_or_else(|| resolver.resolve_type::<M>(), |name| resolver.resolve(name));
        Self::build(connection, table, M::primary_key(), M::accessors(Accessors::new()))
    }

    /// Creates a builder for an already resolved table name. The table is
    /// described once, here.
    pub fn build(
        connection: Arc<dyn Connection>,
        table: String,
        primary_key: &str,
        accessors: Accessors,
    ) -> Self {
        let context = TableContext::load(connection, table, primary_key.to_string(), accessors);
        Self::from_context(Arc::new(context))
    }

    pub(crate) fn from_context(context: Arc<TableContext>) -> Self {
        let query = Query::new(context.table.clone());
        Self {
            context,
            query,
            last: None,
        }
    }

    /// Returns the physical table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.context.table
    }

    /// Returns the primary key column.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.context.primary_key
    }

    /// Returns the described columns; empty when the description failed.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescription] {
        &self.context.columns
    }

    /// Returns the declared query state.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the rows of the last `all`/`get`/`first`/`find` call.
    #[must_use]
    pub const fn last_result(&self) -> Option<&RowCollection> {
        self.last.as_ref()
    }

    // --- Chaining ---

    /// Restricts the selected columns.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.query = self.query.select(columns);
        self
    }

    /// Orders ascending by `column`.
    #[must_use]
    pub fn order_by(mut self, column: &str) -> Self {
        self.query = self.query.order_by(column);
        self
    }

    /// Orders descending by `column`.
    #[must_use]
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.query = self.query.order_by_desc(column);
        self
    }

    /// Orders by `column` in a direction given as text.
    pub fn order_by_dir(mut self, column: &str, direction: &str) -> Result<Self> {
        self.query = self.query.order_by_dir(column, direction)?;
        Ok(self)
    }

    /// Limits the number of rows; values below 1 become 1.
    #[must_use]
    pub fn limit(mut self, n: i64) -> Self {
        self.query.set_limit(n);
        self
    }

    /// Skips rows; negative values become 0.
    #[must_use]
    pub fn offset(mut self, n: i64) -> Self {
        self.query.set_offset(n);
        self
    }

    // --- Compilation ---

    /// Compiles the SELECT with bound parameters.
    #[must_use]
    pub fn to_sql(&self) -> Statement {
        self.query.select_statement(self.context.dialect(), Render::Bind)
    }

    /// Compiles the SELECT with inline literals escaped by the connection.
    #[must_use]
    pub fn to_raw_sql(&self) -> String {
        let escape = |text: &str| self.context.connection.escape(text);
        self.query
            .select_statement(self.context.dialect(), Render::Inline(&escape))
            .sql
    }

    /// Compiles the INSERT of `values` with inline literals.
    #[must_use]
    pub fn to_raw_insert_sql(&self, values: &Attributes) -> String {
        let escape = |text: &str| self.context.connection.escape(text);
        self.query
            .insert_statement(&self.known_columns(values), Render::Inline(&escape))
            .sql
    }

    // --- Reads ---

    /// Runs the SELECT and returns every matching row.
    pub fn all(&mut self) -> Result<RowCollection> {
        let statement = self.to_sql();
        let rows = self.fetch(&statement)?;
        let collection: RowCollection = rows
            .into_iter()
            .map(|attributes| RowModel::new(Arc::clone(&self.context), attributes))
            .collect();
        self.last = Some(collection.clone());
        Ok(collection)
    }

    /// Alias of [`all`](Self::all).
    pub fn get(&mut self) -> Result<RowCollection> {
        self.all()
    }

    /// Runs the SELECT limited to one row.
    pub fn first(&mut self) -> Result<Option<RowModel>> {
        self.query.set_limit(1);
        Ok(self.all()?.into_iter().next())
    }

    /// Like [`first`](Self::first), failing when nothing matches.
    pub fn first_or_fail(&mut self) -> Result<RowModel> {
        self.first()?.ok_or(OrmError::RowNotFound)
    }

    /// Returns the row with the highest primary key. Previously declared
    /// orderings are replaced.
    pub fn last(&mut self) -> Result<Option<RowModel>> {
        self.query.clear_orders();
        self.query.push_order(&self.context.primary_key, Direction::Desc);
        self.first()
    }

    /// Adds `primary key = id` and returns the first match.
    pub fn find(&mut self, id: impl ToSqlValue) -> Result<Option<RowModel>> {
        self.query.conditions_mut().push(WhereCondition::Compare {
            column: self.context.primary_key.clone(),
            operator: Operator::Eq,
            value: Operand::Single(id.to_sql_value()),
            boolean: Boolean::And,
        });
        self.first()
    }

    /// Like [`find`](Self::find), failing when nothing matches.
    pub fn find_or_fail(&mut self, id: impl ToSqlValue) -> Result<RowModel> {
        self.find(id)?.ok_or(OrmError::RowNotFound)
    }

    /// Selects only `attribute` and returns it for every matching row, read
    /// through its getter. Rows without the attribute yield NULL.
    pub fn pluck(&mut self, attribute: &str) -> Result<Vec<SqlValue>> {
        self.query.set_columns([attribute]);
        Ok(self
            .all()?
            .iter()
            .map(|row| row.get(attribute).unwrap_or(SqlValue::Null))
            .collect())
    }

    /// Returns one attribute of the first matching row.
    ///
    /// Fails with [`OrmError::RowNotFound`] when nothing matches; a row
    /// without the attribute yields `None`.
    pub fn value(&mut self, attribute: &str) -> Result<Option<SqlValue>> {
        Ok(self.first_or_fail()?.get(attribute))
    }

    /// Counts the matching rows. Pagination still applies.
    pub fn count(&self) -> Result<i64> {
        let statement = self
            .query
            .count_statement(self.context.dialect(), Render::Bind);
        debug!(table = %self.context.table, sql = %statement.sql, params = statement.params.len(), "count");
        let scalar = self
            .context
            .connection
            .query_scalar(&statement.sql, &statement.params)
            .map_err(OrmError::Database)?;
        Ok(scalar.as_ref().and_then(SqlValue::as_i64).unwrap_or(0))
    }

    /// Returns whether at least one row matches.
    pub fn exists(&self) -> Result<bool> {
        Ok(self.count()? > 0)
    }

    // --- Writes ---

    /// Inserts one row and returns the identifier the database assigned.
    ///
    /// An empty map inserts a row of defaults. A non-empty map naming no
    /// column of the table fails with [`OrmError::UnknownColumns`].
    pub fn insert(&self, values: &Attributes) -> Result<i64> {
        let statement = self
            .query
            .insert_statement(&self.writable(values)?, Render::Bind);
        debug!(table = %self.context.table, sql = %statement.sql, params = statement.params.len(), "insert");
        self.context
            .connection
            .execute_insert(&statement.sql, &statement.params)
            .map_err(OrmError::Database)
    }

    /// Inserts rows one by one, returning their identifiers in input order.
    /// Stops at the first failure; rows inserted before it stay inserted.
    pub fn insert_batch(&self, rows: &[Attributes]) -> Result<Vec<i64>> {
        rows.iter().map(|values| self.insert(values)).collect()
    }

    /// Updates the matching rows. An empty payload touches nothing; a
    /// non-empty one naming no column of the table is an error.
    pub fn update(&self, values: &Attributes) -> Result<u64> {
        self.update_columns(values).map(|(affected, _)| affected)
    }

    /// Like [`update`](Self::update), also returning the columns written.
    pub(crate) fn update_columns(&self, values: &Attributes) -> Result<(u64, Attributes)> {
        let values = self.writable(values)?;
        if values.is_empty() {
            debug!(table = %self.context.table, "update skipped, empty payload");
            return Ok((0, values));
        }
        let statement = self.query.update_statement(&values, Render::Bind);
        let affected = self.execute(&statement, "update")?;
        Ok((affected, values))
    }

    /// Deletes the matching rows.
    pub fn delete(&self) -> Result<u64> {
        let statement = self.query.delete_statement(Render::Bind);
        self.execute(&statement, "delete")
    }

    /// Removes every row of the table, ignoring declared conditions.
    pub fn truncate(&self) -> Result<u64> {
        let statement = self.query.truncate_statement(self.context.dialect());
        self.execute(&statement, "truncate")
    }

    // --- Internals ---

    fn fetch(&self, statement: &Statement) -> Result<Vec<Attributes>> {
        debug!(table = %self.context.table, sql = %statement.sql, params = statement.params.len(), "select");
        self.context
            .connection
            .query(&statement.sql, &statement.params)
            .map_err(OrmError::Database)
    }

    fn execute(&self, statement: &Statement, kind: &str) -> Result<u64> {
        debug!(table = %self.context.table, sql = %statement.sql, params = statement.params.len(), "{kind}");
        self.context
            .connection
            .execute(&statement.sql, &statement.params)
            .map_err(OrmError::Database)
    }

    /// Filters a write payload, failing when a non-empty payload loses
    /// every key.
    fn writable(&self, values: &Attributes) -> Result<Attributes> {
        let known = self.known_columns(values);
        if known.is_empty() && !values.is_empty() {
            return Err(OrmError::UnknownColumns {
                table: self.context.table.clone(),
                columns: values.keys().cloned().collect(),
            });
        }
        Ok(known)
    }

    /// Drops keys the table does not have. Without a description every key
    /// is kept.
    fn known_columns(&self, values: &Attributes) -> Attributes {
        if self.context.columns.is_empty() {
            return values.clone();
        }
        values
            .iter()
            .filter(|(column, _)| {
                let known = self.context.has_column(column);
                if !known {
                    debug!(table = %self.context.table, column = %column, "dropping unknown column");
                }
                known
            })
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect()
    }
}

impl Filterable for QueryBuilder {
    fn conditions_mut(&mut self) -> &mut Vec<WhereCondition> {
        self.query.conditions_mut()
    }
}
