//! # quarry-orm
//!
//! A dynamically-typed query builder and row model.
//!
//! Rows are not mapped onto structs. A [`QueryBuilder`] bound to a table
//! compiles declared conditions through `quarry-core`, runs them on a
//! [`Connection`] and wraps each result row in a [`RowModel`], an ordered
//! attribute map that can read through getters, write through setters and
//! persist itself by primary key.
//!
//! This crate performs no I/O of its own. Driver crates implement
//! [`Connection`]; `quarry-sqlite` provides one over sqlx.
//!
//! ## Querying
//!
//! ```rust,ignore
//! use quarry_orm::{Database, Filterable};
//!
//! let mut listing = db.table("widgets")
//!     .where_op("qty", ">", 5)?
//!     .order_by("name")
//!     .limit(2);
//! let rows = listing.all()?;
//! println!("{}", rows.to_json()?);
//!
//! let total = db.table("widgets").where_null("deleted_at").count()?;
//! ```
//!
//! ## Writing
//!
//! ```rust,ignore
//! use quarry_orm::attributes;
//!
//! let id = db.table("widgets").insert(&attributes! { "name" => "Bolt", "qty" => 10 })?;
//! let mut bolt = db.table("widgets").find_or_fail(id)?;
//! bolt.set("qty", 12);
//! bolt.save()?;
//! ```
//!
//! ## Models
//!
//! Implement [`Model`] on a marker type to fix its table, primary key and
//! accessors, then start queries with [`Database::model`].

mod accessor;
mod builder;
mod collection;
mod config;
mod connection;
mod database;
mod error;
mod model;

pub use accessor::{Accessors, GetterInput};
pub use builder::{QueryBuilder, DEFAULT_PRIMARY_KEY};
pub use collection::RowCollection;
pub use config::{Config, ENV_DATABASE_URL, ENV_MAX_CONNECTIONS, ENV_TABLE_PREFIX};
pub use connection::{BoxError, Connection, DbResult};
pub use database::Database;
pub use error::{OrmError, Result};
pub use model::{Model, RowModel};

// Re-export commonly used types from quarry-core
pub use quarry_core::{
    attributes, Attributes, ColumnDescription, Dialect, Direction, Filterable, Operator,
    SqlValue, Statement, TableResolver, ToSqlValue,
};
