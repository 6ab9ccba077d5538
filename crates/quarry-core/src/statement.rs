//! Compiled statements and the writer that produces them.

use crate::value::{escape_literal, SqlValue};

/// A compiled SQL statement with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// Parameters, in placeholder order.
    pub params: Vec<SqlValue>,
}

/// How values are written into SQL text.
#[derive(Clone, Copy)]
pub enum Render<'a> {
    /// Every value becomes a placeholder plus a bound parameter.
    Bind,
    /// Values are written as literals, escaped by the given routine.
    Inline(&'a dyn Fn(&str) -> String),
}

impl Render<'_> {
    /// Inline rendering with the default quote-doubling escape.
    pub const INLINE: Render<'static> = Render::Inline(&escape_literal);
}

/// Accumulates SQL text and parameters.
pub(crate) struct SqlWriter<'a> {
    sql: String,
    params: Vec<SqlValue>,
    render: Render<'a>,
}

impl<'a> SqlWriter<'a> {
    pub(crate) fn new(render: Render<'a>) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            render,
        }
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    /// Writes a value: numeric bare, everything else quoted, when inline.
    pub(crate) fn value(&mut self, value: &SqlValue) {
        match self.render {
            Render::Bind => self.bind(value),
            Render::Inline(escape) => self.sql.push_str(&value.to_sql_inline_with(escape)),
        }
    }

    /// Writes a value quoted even when numeric, when inline.
    pub(crate) fn quoted_value(&mut self, value: &SqlValue) {
        match self.render {
            Render::Bind => self.bind(value),
            Render::Inline(escape) => self.sql.push_str(&value.to_sql_quoted_with(escape)),
        }
    }

    /// Writes values separated by `separator`.
    pub(crate) fn values(&mut self, values: &[SqlValue], separator: &str) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            self.value(value);
        }
    }

    fn bind(&mut self, value: &SqlValue) {
        self.sql.push_str(SqlValue::placeholder());
        self.params.push(value.clone());
    }

    pub(crate) fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}
