//! Per-query state and its compilation to SQL.
//!
//! A [`Query`] holds everything a caller declared against one table:
//! selected columns, where-conditions, ordering and pagination. It compiles
//! on demand to SELECT, COUNT, INSERT, UPDATE, DELETE and TRUNCATE
//! statements, either with bound parameters or with inline literals.

use std::fmt;
use std::str::FromStr;

use crate::condition::{Boolean, Filterable, Operand, WhereCondition};
use crate::dialect::Dialect;
use crate::error::QueryError;
use crate::operator::Operator;
use crate::statement::{Render, SqlWriter, Statement};
use crate::value::{Attributes, SqlValue};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl Direction {
    /// Returns the lower-case SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(QueryError::UnsupportedDirection(s.to_string())),
        }
    }
}

/// An ordering specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Column to order by.
    pub column: String,
    /// Order direction.
    pub direction: Direction,
}

/// Declared state of one query against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    columns: Vec<String>,
    conditions: Vec<WhereCondition>,
    orders: Vec<Order>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Query {
    /// Creates an unrestricted query against `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            conditions: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the selected columns; empty means `*`.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the where-conditions in declaration order.
    #[must_use]
    pub fn conditions(&self) -> &[WhereCondition] {
        &self.conditions
    }

    /// Returns the ordering specifications.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Returns the clamped LIMIT, if set.
    #[must_use]
    pub const fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    /// Returns the clamped OFFSET, if set.
    #[must_use]
    pub const fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    /// Replaces the selected columns. They are kept sorted so the compiled
    /// SQL does not depend on declaration order.
    pub fn set_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self.columns.sort();
    }

    /// Selects specific columns.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.set_columns(columns.iter().copied());
        self
    }

    /// Appends an ordering specification.
    pub fn push_order(&mut self, column: &str, direction: Direction) {
        self.orders.push(Order {
            column: column.to_string(),
            direction,
        });
    }

    /// Removes every ordering specification.
    pub fn clear_orders(&mut self) {
        self.orders.clear();
    }

    /// Orders ascending by `column`.
    #[must_use]
    pub fn order_by(mut self, column: &str) -> Self {
        self.push_order(column, Direction::Asc);
        self
    }

    /// Orders descending by `column`.
    #[must_use]
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.push_order(column, Direction::Desc);
        self
    }

    /// Orders by `column` in a direction given as text (`"asc"`/`"DESC"`).
    pub fn order_by_dir(mut self, column: &str, direction: &str) -> crate::Result<Self> {
        self.push_order(column, direction.parse()?);
        Ok(self)
    }

    /// Sets LIMIT, clamped to at least 1.
    pub fn set_limit(&mut self, n: i64) {
        self.limit = Some(n.max(1));
    }

    /// Sets OFFSET, clamped to at least 0.
    pub fn set_offset(&mut self, n: i64) {
        self.offset = Some(n.max(0));
    }

    /// Limits the number of rows; values below 1 become 1.
    #[must_use]
    pub fn limit(mut self, n: i64) -> Self {
        self.set_limit(n);
        self
    }

    /// Skips rows; negative values become 0.
    #[must_use]
    pub fn offset(mut self, n: i64) -> Self {
        self.set_offset(n);
        self
    }

    /// Compiles `SELECT <columns> FROM <table> <where> <order> <limit> <offset>`.
    #[must_use]
    pub fn select_statement(&self, dialect: &dyn Dialect, render: Render<'_>) -> Statement {
        let mut w = SqlWriter::new(render);
        w.push("SELECT ");
        if self.columns.is_empty() {
            w.push("*");
        } else {
            w.push(&self.columns.join(", "));
        }
        w.push(" FROM ");
        w.push(&self.table);
        self.write_tail(&mut w, dialect);
        w.finish()
    }

    /// Compiles the `SELECT COUNT(*)` variant of the select statement.
    #[must_use]
    pub fn count_statement(&self, dialect: &dyn Dialect, render: Render<'_>) -> Statement {
        let mut w = SqlWriter::new(render);
        w.push("SELECT COUNT(*) FROM ");
        w.push(&self.table);
        self.write_tail(&mut w, dialect);
        w.finish()
    }

    /// Compiles `INSERT INTO <table> (<cols>) VALUES (<values>)`.
    ///
    /// Inline rendering quotes every value, numbers included.
    #[must_use]
    pub fn insert_statement(&self, values: &Attributes, render: Render<'_>) -> Statement {
        let mut w = SqlWriter::new(render);
        w.push("INSERT INTO ");
        w.push(&self.table);
        if values.is_empty() {
            w.push(" DEFAULT VALUES");
            return w.finish();
        }
        w.push(" (");
        let columns: Vec<&str> = values.keys().map(String::as_str).collect();
        w.push(&columns.join(","));
        w.push(") VALUES (");
        for (i, value) in values.values().enumerate() {
            if i > 0 {
                w.push(",");
            }
            w.quoted_value(value);
        }
        w.push(")");
        w.finish()
    }

    /// Compiles `UPDATE <table> SET col=val[,...] <where>`.
    ///
    /// `values` must not be empty.
    #[must_use]
    pub fn update_statement(&self, values: &Attributes, render: Render<'_>) -> Statement {
        let mut w = SqlWriter::new(render);
        w.push("UPDATE ");
        w.push(&self.table);
        w.push(" SET ");
        for (i, (column, value)) in values.iter().enumerate() {
            if i > 0 {
                w.push(",");
            }
            w.push(column);
            w.push("=");
            w.value(value);
        }
        self.write_where(&mut w);
        w.finish()
    }

    /// Compiles `DELETE FROM <table> <where>`.
    #[must_use]
    pub fn delete_statement(&self, render: Render<'_>) -> Statement {
        let mut w = SqlWriter::new(render);
        w.push("DELETE FROM ");
        w.push(&self.table);
        self.write_where(&mut w);
        w.finish()
    }

    /// Compiles the dialect's statement emptying the table.
    #[must_use]
    pub fn truncate_statement(&self, dialect: &dyn Dialect) -> Statement {
        Statement {
            sql: dialect.truncate_table(&self.table),
            params: Vec::new(),
        }
    }

    fn write_tail(&self, w: &mut SqlWriter<'_>, dialect: &dyn Dialect) {
        self.write_where(w);

        if !self.orders.is_empty() {
            w.push(" ORDER BY ");
            let parts: Vec<String> = self
                .orders
                .iter()
                .map(|o| format!("{} {}", o.column, o.direction))
                .collect();
            w.push(&parts.join(", "));
        }

        match (self.limit, self.offset) {
            (None, Some(offset)) => {
                w.push(&format!(" LIMIT {} OFFSET {offset}", dialect.max_limit()));
            }
            (limit, offset) => {
                if let Some(limit) = limit {
                    w.push(&format!(" LIMIT {limit}"));
                }
                if let Some(offset) = offset {
                    w.push(&format!(" OFFSET {offset}"));
                }
            }
        }
    }

    fn write_where(&self, w: &mut SqlWriter<'_>) {
        w.push(" WHERE 1");
        write_conditions(w, &self.conditions);
    }
}

impl Filterable for Query {
    fn conditions_mut(&mut self) -> &mut Vec<WhereCondition> {
        &mut self.conditions
    }
}

/// Writes each condition prefixed by its combinator. The list follows a
/// tautology, so the first combinator is always written as AND.
fn write_conditions(w: &mut SqlWriter<'_>, conditions: &[WhereCondition]) {
    for (i, condition) in conditions.iter().enumerate() {
        let boolean = if i == 0 {
            Boolean::And
        } else {
            condition.boolean()
        };
        w.push(" ");
        w.push(boolean.as_str());
        w.push(" ");
        write_condition(w, condition);
    }
}

fn write_condition(w: &mut SqlWriter<'_>, condition: &WhereCondition) {
    let (column, operator, value) = match condition {
        WhereCondition::Group { conditions, .. } => {
            w.push("(1");
            write_conditions(w, conditions);
            w.push(")");
            return;
        }
        WhereCondition::Compare {
            column,
            operator,
            value,
            ..
        } => (column, *operator, value),
    };

    match (operator, value) {
        (Operator::Eq, Operand::Single(SqlValue::Null)) => {
            w.push(column);
            w.push(" IS NULL");
        }
        (Operator::LtGt | Operator::Ne, Operand::Single(SqlValue::Null)) => {
            w.push(column);
            w.push(" IS NOT NULL");
        }
        (Operator::In, Operand::List(values)) if values.is_empty() => w.push("0 = 1"),
        (Operator::NotIn, Operand::List(values)) if values.is_empty() => w.push("1 = 1"),
        (Operator::Between | Operator::NotBetween, Operand::List(values)) => {
            w.push(column);
            w.push(" ");
            w.push(operator.as_str());
            w.push(" ");
            w.values(values, " AND ");
        }
        (_, Operand::List(values)) => {
            w.push(column);
            w.push(" ");
            w.push(operator.as_str());
            w.push(" (");
            w.values(values, ", ");
            w.push(")");
        }
        (_, Operand::Single(value)) => {
            w.push(column);
            w.push(" ");
            w.push(operator.as_str());
            w.push(" ");
            w.value(value);
        }
    }
}
