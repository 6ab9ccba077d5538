//! # quarry-sqlite
//!
//! SQLite support for `quarry-orm`, built on sqlx.
//!
//! [`SqliteConnection`] implements the blocking
//! [`Connection`](quarry_orm::Connection) contract by driving an sqlx pool
//! on a private current-thread tokio runtime. Rows are decoded by the
//! storage class of each value, and tables are described through
//! `pragma_table_info`.
//!
//! # How SQLite differs
//!
//! - There is no `TRUNCATE`; truncation runs an unqualified `DELETE`.
//! - Columns have [type affinity], not fixed types: a value comes back as
//!   whatever storage class it was written with.
//! - A single `INTEGER PRIMARY KEY` column aliases the rowid and is
//!   reported with `extra = "auto_increment"`.
//!
//! [type affinity]: https://www.sqlite.org/datatype3.html
//!
//! ## Example
//!
//! ```rust
//! use quarry_orm::{attributes, Config, Filterable, SqlValue};
//!
//! let config = Config::new("sqlite::memory:").table_prefix("wp_");
//! let conn = quarry_sqlite::SqliteConnection::connect_with(&config)?;
//! conn.execute_script("CREATE TABLE wp_widgets (id INTEGER PRIMARY KEY, name TEXT, qty INTEGER)")?;
//! let db = quarry_orm::Database::with_config(conn, &config);
//!
//! let id = db.table("widgets").insert(&attributes! { "name" => "Bolt", "qty" => 10 })?;
//! let qty = db.table("widgets").where_eq("id", id).value("qty")?;
//! assert_eq!(qty, Some(SqlValue::Int(10)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod connection;
mod error;

use quarry_orm::{Config, Database};

pub use connection::SqliteConnection;
pub use error::{Result, SqliteError};

/// Opens the database named by `config` and wraps it with the configured
/// table prefix.
pub fn connect(config: &Config) -> Result<Database> {
    let connection = SqliteConnection::connect_with(config)?;
    Ok(Database::with_config(connection, config))
}
