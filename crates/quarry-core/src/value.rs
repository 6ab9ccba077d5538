//! SQL values and row attribute maps.
//!
//! Rows have no fixed schema: every column of every table is read into a
//! [`SqlValue`] and a row is an [`Attributes`] map keyed by column name in
//! the order the database returned the columns.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::ser::{Serialize, Serializer};

/// One materialised row: column name to value, in column order.
pub type Attributes = IndexMap<String, SqlValue>;

/// A SQL value that can be bound as a parameter or stored in a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$")
            .unwrap_or_else(|e| unreachable!("numeric pattern is valid: {e}"))
    })
}

/// Returns whether `text` reads as a decimal number (`10`, `-2.5`, `1e3`).
#[must_use]
pub fn is_numeric_text(text: &str) -> bool {
    numeric_pattern().is_match(text)
}

/// Escapes a string literal body by doubling single quotes.
#[must_use]
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

impl SqlValue {
    /// Returns true for NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as a float, converting integers and numeric text.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the SQL representation for inline use.
    ///
    /// Numeric values render bare; everything else is single-quoted with
    /// embedded quotes doubled.
    ///
    /// **Warning**: statements sent to a connection always bind values;
    /// this form is for logs and diagnostics.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        self.to_sql_inline_with(escape_literal)
    }

    /// Like [`Self::to_sql_inline`], with a caller-supplied escape routine.
    #[must_use]
    pub fn to_sql_inline_with(&self, escape: impl Fn(&str) -> String) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) if is_numeric_text(s) => s.clone(),
            Self::Text(s) => format!("'{}'", escape(s)),
            Self::Blob(b) => hex_literal(b),
        }
    }

    /// Returns the SQL representation with every non-NULL scalar quoted.
    ///
    /// Used for INSERT value lists, where even numbers are written as
    /// escaped string literals.
    #[must_use]
    pub fn to_sql_quoted_with(&self, escape: impl Fn(&str) -> String) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Blob(b) => hex_literal(b),
            Self::Text(s) => format!("'{}'", escape(s)),
            other => format!("'{}'", escape(&other.to_string())),
        }
    }

    /// Returns the parameter placeholder.
    #[must_use]
    pub const fn placeholder() -> &'static str {
        "?"
    }
}

fn hex_literal(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
    format!("X'{hex}'")
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{}", u8::from(*b)),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => f.write_str(&hex_literal(b)),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Blob(b) => serializer.serialize_bytes(b),
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for &SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self.clone()
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! impl_to_sql_int {
    ($($ty:ty),+) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )+
    };
}

impl_to_sql_int!(i64, i32, i16, i8, u32, u16, u8);

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

/// Builds an [`Attributes`] map from `key => value` pairs.
///
/// ```rust
/// use quarry_core::{attributes, SqlValue};
///
/// let row = attributes! { "name" => "Bolt", "qty" => 10 };
/// assert_eq!(row["qty"], SqlValue::Int(10));
/// ```
#[macro_export]
macro_rules! attributes {
    () => { $crate::Attributes::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Attributes::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::ToSqlValue::to_sql_value($value),
            );
        )+
        map
    }};
}
