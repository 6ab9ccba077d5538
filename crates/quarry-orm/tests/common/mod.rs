#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use quarry_orm::{
    Attributes, ColumnDescription, Connection, Database, DbResult, SqlValue, Statement,
    TableResolver,
};

/// Routes `debug!` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// In-memory connection returning canned rows and recording every statement.
#[derive(Default)]
pub struct FakeConnection {
    columns: Option<Vec<ColumnDescription>>,
    results: Mutex<VecDeque<Vec<Attributes>>>,
    log: Mutex<Vec<Statement>>,
    last_id: AtomicI64,
    executes: AtomicI64,
    fail_at: Option<i64>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Describes every table with these columns; `id` is the key.
    pub fn with_columns(mut self, names: &[&str]) -> Self {
        self.columns = Some(
            names
                .iter()
                .map(|name| ColumnDescription {
                    name: (*name).to_string(),
                    data_type: "TEXT".to_string(),
                    nullable: *name != "id",
                    key: if *name == "id" { "PRI".to_string() } else { String::new() },
                    ..ColumnDescription::default()
                })
                .collect(),
        );
        self
    }

    /// Fails the `n`-th execute call (1-based).
    pub fn fail_execute_at(mut self, n: i64) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Queues the rows the next query returns.
    pub fn push_rows(&self, rows: Vec<Attributes>) {
        self.results.lock().unwrap().push_back(rows);
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.log.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|s| s.sql).collect()
    }

    pub fn last_statement(&self) -> Statement {
        self.statements().pop().expect("no statement was run")
    }

    fn record(&self, sql: &str, params: &[SqlValue]) {
        self.log.lock().unwrap().push(Statement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

impl Connection for FakeConnection {
    fn describe(&self, _table: &str) -> DbResult<Vec<ColumnDescription>> {
        self.columns.clone().ok_or_else(|| "no such table".into())
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Attributes>> {
        self.record(sql, params);
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<u64> {
        self.record(sql, params);
        let n = self.executes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(n) {
            return Err(format!("constraint failed on statement {n}").into());
        }
        if sql.starts_with("INSERT") {
            self.last_id.fetch_add(1, Ordering::SeqCst);
        }
        Ok(1)
    }

    fn last_insert_id(&self) -> i64 {
        self.last_id.load(Ordering::SeqCst)
    }
}

/// A database over `fake` with the `wp_` table prefix.
pub fn database(fake: &Arc<FakeConnection>) -> Database {
    init_tracing();
    Database::from_arc(fake.clone(), TableResolver::new("wp_"))
}

/// A fake describing the widgets table.
pub fn widgets() -> Arc<FakeConnection> {
    Arc::new(FakeConnection::new().with_columns(&["id", "name", "qty", "price"]))
}
