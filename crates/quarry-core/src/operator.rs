//! Comparison operators accepted in where-conditions.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// A where-condition operator.
///
/// Every variant except the list/range ones can be named by callers; the
/// list/range operators are only produced by `where_in`, `where_between`
/// and their variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `<>`
    LtGt,
    /// `!=`
    Ne,
    /// `<=>`
    NullSafeEq,
    /// `LIKE`
    Like,
    /// `LIKE BINARY`
    LikeBinary,
    /// `NOT LIKE`
    NotLike,
    /// `ILIKE`
    Ilike,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `RLIKE`
    Rlike,
    /// `NOT RLIKE`
    NotRlike,
    /// `REGEXP`
    Regexp,
    /// `NOT REGEXP`
    NotRegexp,
    /// `~`
    Match,
    /// `~*`
    MatchInsensitive,
    /// `!~`
    NotMatch,
    /// `!~*`
    NotMatchInsensitive,
    /// `SIMILAR TO`
    SimilarTo,
    /// `NOT SIMILAR TO`
    NotSimilarTo,
    /// `NOT ILIKE`
    NotIlike,
    /// `~~*`
    TildeIlike,
    /// `!~~*`
    NotTildeIlike,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `BETWEEN`
    Between,
    /// `NOT BETWEEN`
    NotBetween,
}

impl Operator {
    /// Operators a caller may name, in allow-list order.
    pub const ALLOWED: &'static [Self] = &[
        Self::Eq,
        Self::Lt,
        Self::Gt,
        Self::Lte,
        Self::Gte,
        Self::LtGt,
        Self::Ne,
        Self::NullSafeEq,
        Self::Like,
        Self::LikeBinary,
        Self::NotLike,
        Self::Ilike,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::Rlike,
        Self::NotRlike,
        Self::Regexp,
        Self::NotRegexp,
        Self::Match,
        Self::MatchInsensitive,
        Self::NotMatch,
        Self::NotMatchInsensitive,
        Self::SimilarTo,
        Self::NotSimilarTo,
        Self::NotIlike,
        Self::TildeIlike,
        Self::NotTildeIlike,
    ];

    /// Returns the SQL text of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::LtGt => "<>",
            Self::Ne => "!=",
            Self::NullSafeEq => "<=>",
            Self::Like => "LIKE",
            Self::LikeBinary => "LIKE BINARY",
            Self::NotLike => "NOT LIKE",
            Self::Ilike => "ILIKE",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Rlike => "RLIKE",
            Self::NotRlike => "NOT RLIKE",
            Self::Regexp => "REGEXP",
            Self::NotRegexp => "NOT REGEXP",
            Self::Match => "~",
            Self::MatchInsensitive => "~*",
            Self::NotMatch => "!~",
            Self::NotMatchInsensitive => "!~*",
            Self::SimilarTo => "SIMILAR TO",
            Self::NotSimilarTo => "NOT SIMILAR TO",
            Self::NotIlike => "NOT ILIKE",
            Self::TildeIlike => "~~*",
            Self::NotTildeIlike => "!~~*",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
        }
    }

    /// Returns whether the operator may be compared against NULL.
    #[must_use]
    pub const fn accepts_null(self) -> bool {
        matches!(self, Self::Eq | Self::LtGt | Self::Ne)
    }

    /// Returns whether the operator takes a list operand.
    #[must_use]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::Between | Self::NotBetween)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    /// Parses an allow-listed operator, ignoring case and surrounding or
    /// repeated whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        Self::ALLOWED
            .iter()
            .copied()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| QueryError::UnsupportedOperator(s.to_string()))
    }
}
