//! Where-conditions and the chainable methods that declare them.
//!
//! Conditions form an ordered list. Each carries the boolean combinator
//! that joins it to whatever precedes it; the first combinator of a list is
//! cosmetic because compiled lists always start from the tautology `1`.

use std::fmt;

use crate::error::{QueryError, Result};
use crate::operator::Operator;
use crate::value::{SqlValue, ToSqlValue};

/// Boolean combinator joining a condition to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boolean {
    /// AND
    #[default]
    And,
    /// OR
    Or,
}

impl Boolean {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single scalar.
    Single(SqlValue),
    /// A sequence, for `IN`, `NOT IN`, `BETWEEN` and `NOT BETWEEN`.
    List(Vec<SqlValue>),
}

/// One filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereCondition {
    /// `column operator value`
    Compare {
        /// Column name, written as given.
        column: String,
        /// Comparison operator.
        operator: Operator,
        /// Scalar or list operand.
        value: Operand,
        /// Combinator with the previous condition.
        boolean: Boolean,
    },
    /// A parenthesised sub-list.
    Group {
        /// Conditions inside the parentheses.
        conditions: Vec<WhereCondition>,
        /// Combinator with the previous condition.
        boolean: Boolean,
    },
}

impl WhereCondition {
    /// Returns the combinator joining this condition to the previous one.
    #[must_use]
    pub const fn boolean(&self) -> Boolean {
        match self {
            Self::Compare { boolean, .. } | Self::Group { boolean, .. } => *boolean,
        }
    }
}

/// Conversion into an allow-listed operator.
pub trait IntoOperator {
    /// Resolves the operator, failing for anything off the allow-list.
    fn into_operator(self) -> Result<Operator>;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Result<Operator> {
        Ok(self)
    }
}

impl IntoOperator for &str {
    fn into_operator(self) -> Result<Operator> {
        self.parse()
    }
}

impl IntoOperator for String {
    fn into_operator(self) -> Result<Operator> {
        self.parse()
    }
}

/// One entry of a condition batch: `(column, value)` or
/// `(column, operator, value)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Equality on a column.
    Eq(String, SqlValue),
    /// Comparison with an explicit operator.
    Op(String, String, SqlValue),
}

impl<V: ToSqlValue> From<(&str, V)> for Clause {
    fn from((column, value): (&str, V)) -> Self {
        Self::Eq(column.to_string(), value.to_sql_value())
    }
}

impl<V: ToSqlValue> From<(&str, &str, V)> for Clause {
    fn from((column, operator, value): (&str, &str, V)) -> Self {
        Self::Op(column.to_string(), operator.to_string(), value.to_sql_value())
    }
}

/// Builds one comparison, rejecting NULL against operators that cannot
/// compare with it.
fn compare(
    column: &str,
    operator: impl IntoOperator,
    value: SqlValue,
    boolean: Boolean,
) -> Result<WhereCondition> {
    let operator = operator.into_operator()?;
    if value.is_null() && !operator.accepts_null() {
        return Err(QueryError::InvalidOperatorValue {
            operator: operator.to_string(),
        });
    }
    Ok(WhereCondition::Compare {
        column: column.to_string(),
        operator,
        value: Operand::Single(value),
        boolean,
    })
}

fn list<I, V>(column: &str, operator: Operator, values: I, boolean: Boolean) -> WhereCondition
where
    I: IntoIterator<Item = V>,
    V: ToSqlValue,
{
    WhereCondition::Compare {
        column: column.to_string(),
        operator,
        value: Operand::List(values.into_iter().map(ToSqlValue::to_sql_value).collect()),
        boolean,
    }
}

/// Chainable where-condition declarations.
///
/// Implementors only expose their condition list; every builder method is
/// provided. Fallible methods return the builder inside a `Result` so
/// chains read `.where_op("qty", ">", 5)?.order_by("name")`.
pub trait Filterable: Sized {
    /// Returns the condition list this builder appends to.
    fn conditions_mut(&mut self) -> &mut Vec<WhereCondition>;

    /// Appends a fully specified condition.
    fn where_with(
        mut self,
        column: &str,
        operator: impl IntoOperator,
        value: impl ToSqlValue,
        boolean: Boolean,
    ) -> Result<Self> {
        let condition = compare(column, operator, value.to_sql_value(), boolean)?;
        self.conditions_mut().push(condition);
        Ok(self)
    }

    /// `AND column = value`. NULL compiles to `IS NULL`.
    #[must_use]
    fn where_eq(mut self, column: &str, value: impl ToSqlValue) -> Self {
        self.conditions_mut().push(WhereCondition::Compare {
            column: column.to_string(),
            operator: Operator::Eq,
            value: Operand::Single(value.to_sql_value()),
            boolean: Boolean::And,
        });
        self
    }

    /// `OR column = value`.
    #[must_use]
    fn or_where_eq(mut self, column: &str, value: impl ToSqlValue) -> Self {
        self.conditions_mut().push(WhereCondition::Compare {
            column: column.to_string(),
            operator: Operator::Eq,
            value: Operand::Single(value.to_sql_value()),
            boolean: Boolean::Or,
        });
        self
    }

    /// `AND column operator value`.
    fn where_op(
        self,
        column: &str,
        operator: impl IntoOperator,
        value: impl ToSqlValue,
    ) -> Result<Self> {
        self.where_with(column, operator, value, Boolean::And)
    }

    /// `OR column operator value`.
    fn or_where_op(
        self,
        column: &str,
        operator: impl IntoOperator,
        value: impl ToSqlValue,
    ) -> Result<Self> {
        self.where_with(column, operator, value, Boolean::Or)
    }

    /// Appends one condition per clause, each joined with AND.
    fn where_all<I, C>(self, clauses: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        self.batch(Boolean::And, clauses)
    }

    /// Appends one condition per clause, each joined with OR.
    fn or_where_all<I, C>(self, clauses: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        self.batch(Boolean::Or, clauses)
    }

    #[doc(hidden)]
    fn batch<I, C>(self, boolean: Boolean, clauses: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Clause>,
    {
        clauses
            .into_iter()
            .try_fold(self, |query, clause| match clause.into() {
                Clause::Eq(column, value) => query.where_with(&column, Operator::Eq, value, boolean),
                Clause::Op(column, operator, value) => {
                    query.where_with(&column, operator, value, boolean)
                }
            })
    }

    /// `AND column IN (...)`.
    #[must_use]
    fn where_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.conditions_mut()
            .push(list(column, Operator::In, values, Boolean::And));
        self
    }

    /// `OR column IN (...)`.
    #[must_use]
    fn or_where_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.conditions_mut()
            .push(list(column, Operator::In, values, Boolean::Or));
        self
    }

    /// `AND column NOT IN (...)`.
    #[must_use]
    fn where_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.conditions_mut()
            .push(list(column, Operator::NotIn, values, Boolean::And));
        self
    }

    /// `OR column NOT IN (...)`.
    #[must_use]
    fn or_where_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToSqlValue,
    {
        self.conditions_mut()
            .push(list(column, Operator::NotIn, values, Boolean::Or));
        self
    }

    /// `AND column BETWEEN low AND high`.
    #[must_use]
    fn where_between<V: ToSqlValue>(mut self, column: &str, low: V, high: V) -> Self {
        self.conditions_mut()
            .push(list(column, Operator::Between, [low, high], Boolean::And));
        self
    }

    /// `OR column BETWEEN low AND high`.
    #[must_use]
    fn or_where_between<V: ToSqlValue>(mut self, column: &str, low: V, high: V) -> Self {
        self.conditions_mut()
            .push(list(column, Operator::Between, [low, high], Boolean::Or));
        self
    }

    /// `AND column NOT BETWEEN low AND high`.
    #[must_use]
    fn where_not_between<V: ToSqlValue>(mut self, column: &str, low: V, high: V) -> Self {
        self.conditions_mut()
            .push(list(column, Operator::NotBetween, [low, high], Boolean::And));
        self
    }

    /// `OR column NOT BETWEEN low AND high`.
    #[must_use]
    fn or_where_not_between<V: ToSqlValue>(mut self, column: &str, low: V, high: V) -> Self {
        self.conditions_mut()
            .push(list(column, Operator::NotBetween, [low, high], Boolean::Or));
        self
    }

    /// `AND column IS NULL`.
    #[must_use]
    fn where_null(self, column: &str) -> Self {
        self.where_eq(column, SqlValue::Null)
    }

    /// `AND column IS NOT NULL`.
    #[must_use]
    fn where_not_null(mut self, column: &str) -> Self {
        self.conditions_mut().push(WhereCondition::Compare {
            column: column.to_string(),
            operator: Operator::Ne,
            value: Operand::Single(SqlValue::Null),
            boolean: Boolean::And,
        });
        self
    }

    /// `AND ( ... )` with the conditions declared by `build`.
    fn where_group<F>(self, build: F) -> Result<Self>
    where
        F: FnOnce(ConditionGroup) -> Result<ConditionGroup>,
    {
        self.group(Boolean::And, build)
    }

    /// `OR ( ... )` with the conditions declared by `build`.
    fn or_where_group<F>(self, build: F) -> Result<Self>
    where
        F: FnOnce(ConditionGroup) -> Result<ConditionGroup>,
    {
        self.group(Boolean::Or, build)
    }

    #[doc(hidden)]
    fn group<F>(mut self, boolean: Boolean, build: F) -> Result<Self>
    where
        F: FnOnce(ConditionGroup) -> Result<ConditionGroup>,
    {
        let group = build(ConditionGroup::default())?;
        if !group.conditions.is_empty() {
            self.conditions_mut().push(WhereCondition::Group {
                conditions: group.conditions,
                boolean,
            });
        }
        Ok(self)
    }
}

/// A free-standing condition list, handed to `where_group` closures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionGroup {
    conditions: Vec<WhereCondition>,
}

impl ConditionGroup {
    /// Returns the declared conditions.
    #[must_use]
    pub fn conditions(&self) -> &[WhereCondition] {
        &self.conditions
    }
}

impl Filterable for ConditionGroup {
    fn conditions_mut(&mut self) -> &mut Vec<WhereCondition> {
        &mut self.conditions
    }
}
