//! # quarry-core
//!
//! SQL compilation for a dynamically-typed query builder.
//!
//! This crate is free of I/O. It provides:
//! - [`SqlValue`] and [`Attributes`], the tagged value and ordered row map
//! - the operator allow-list and where-conditions ([`Filterable`])
//! - [`Query`], compiled to [`Statement`]s with bound parameters or inline
//!   literals
//! - [`TableResolver`] for prefixed snake_case table names
//! - [`Dialect`] for the few engine-specific statements
//!
//! ```rust
//! use quarry_core::{Filterable, GenericDialect, Query, Render, SqlValue};
//!
//! let query = Query::new("wp_widgets")
//!     .where_op("qty", ">", 5)?
//!     .order_by("name")
//!     .limit(2);
//!
//! let statement = query.select_statement(&GenericDialect, Render::Bind);
//! assert_eq!(
//!     statement.sql,
//!     "SELECT * FROM wp_widgets WHERE 1 AND qty > ? ORDER BY name asc LIMIT 2"
//! );
//! assert_eq!(statement.params, vec![SqlValue::Int(5)]);
//! # Ok::<(), quarry_core::QueryError>(())
//! ```

pub mod condition;
pub mod dialect;
mod error;
pub mod operator;
pub mod query;
pub mod schema;
pub mod statement;
pub mod table;
pub mod value;

pub use condition::{Boolean, Clause, ConditionGroup, Filterable, IntoOperator, Operand, WhereCondition};
pub use dialect::{Dialect, GenericDialect, SqliteDialect};
pub use error::{QueryError, Result};
pub use operator::Operator;
pub use query::{Direction, Order, Query};
pub use schema::ColumnDescription;
pub use statement::{Render, Statement};
pub use table::TableResolver;
pub use value::{Attributes, SqlValue, ToSqlValue};
