//! A blocking [`Connection`] over an sqlx SQLite pool.

use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use quarry_core::{Attributes, ColumnDescription, Dialect, SqlValue, SqliteDialect};
use quarry_orm::{Config, Connection, DbResult};

use crate::error::Result;

/// SQLite handle driven by a private current-thread runtime.
///
/// Every call blocks until sqlx finishes, so a `SqliteConnection` must not
/// be used from inside another tokio runtime.
#[derive(Debug)]
pub struct SqliteConnection {
    pool: SqlitePool,
    runtime: Runtime,
    last_insert_id: AtomicI64,
}

impl SqliteConnection {
    /// Opens `url` with default settings.
    pub fn connect(url: &str) -> Result<Self> {
        Self::connect_with(&Config::new(url))
    }

    /// Opens the database named by `config`, creating the file if needed.
    ///
    /// In-memory databases live as long as their single connection, so
    /// their pool is capped at one connection that is never recycled.
    pub fn connect_with(config: &Config) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        let mut max_connections = config.max_connections.max(1);
        if is_memory(&config.database_url) && max_connections > 1 {
            warn!(
                url = %config.database_url,
                requested = max_connections,
                "in-memory database limited to one connection"
            );
            max_connections = 1;
        }

        let pool = runtime.block_on(
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options),
        )?;
        info!(url = %config.database_url, max_connections, "connected to sqlite");

        Ok(Self {
            pool,
            runtime,
            last_insert_id: AtomicI64::new(0),
        })
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs semicolon-separated statements without parameters, e.g. a
    /// schema script.
    pub fn execute_script(&self, sql: &str) -> Result<()> {
        debug!(sql = %sql, "executing script");
        self.runtime
            .block_on(sqlx::raw_sql(sql).execute(&self.pool))?;
        Ok(())
    }
}

impl Connection for SqliteConnection {
    fn describe(&self, table: &str) -> DbResult<Vec<ColumnDescription>> {
        let rows: Vec<(String, String, i64, Option<String>, i64)> = self.runtime.block_on(
            sqlx::query_as(
                "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid",
            )
            .bind(table)
            .fetch_all(&self.pool),
        )?;

        let key_columns = rows.iter().filter(|row| row.4 > 0).count();
        let columns = rows
            .into_iter()
            .map(|(name, data_type, not_null, default, pk)| {
                let rowid_alias = pk > 0 && key_columns == 1 && data_type.eq_ignore_ascii_case("INTEGER");
                ColumnDescription {
                    name,
                    data_type,
                    nullable: not_null == 0,
                    key: if pk > 0 { "PRI".to_string() } else { String::new() },
                    default,
                    extra: if rowid_alias { "auto_increment".to_string() } else { String::new() },
                }
            })
            .collect();
        Ok(columns)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Attributes>> {
        let rows = self
            .runtime
            .block_on(bind_params(sqlx::query(sql), params).fetch_all(&self.pool))?;
        let attributes = rows.iter().map(decode_row).collect::<std::result::Result<_, _>>()?;
        Ok(attributes)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<u64> {
        let result = self
            .runtime
            .block_on(bind_params(sqlx::query(sql), params).execute(&self.pool))?;
        self.last_insert_id
            .store(result.last_insert_rowid(), Ordering::SeqCst);
        Ok(result.rows_affected())
    }

    fn last_insert_id(&self) -> i64 {
        self.last_insert_id.load(Ordering::SeqCst)
    }

    fn execute_insert(&self, sql: &str, params: &[SqlValue]) -> DbResult<i64> {
        let result = self
            .runtime
            .block_on(bind_params(sqlx::query(sql), params).execute(&self.pool))?;
        let id = result.last_insert_rowid();
        self.last_insert_id.store(id, Ordering::SeqCst);
        Ok(id)
    }

    fn dialect(&self) -> &dyn Dialect {
        &SqliteDialect
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

fn is_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in params {
        query = match value {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Blob(b) => query.bind(b.clone()),
        };
    }
    query
}

/// Reads a row by the storage class of each value, since SQLite columns
/// are not bound to one type.
fn decode_row(row: &SqliteRow) -> std::result::Result<Attributes, sqlx::Error> {
    let mut attributes = Attributes::with_capacity(row.len());
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => SqlValue::Int(row.try_get_unchecked(index)?),
                "REAL" | "NUMERIC" => SqlValue::Float(row.try_get_unchecked(index)?),
                "BLOB" => SqlValue::Blob(row.try_get_unchecked(index)?),
                _ => SqlValue::Text(row.try_get_unchecked(index)?),
            }
        };
        attributes.insert(column.name().to_string(), value);
    }
    Ok(attributes)
}
