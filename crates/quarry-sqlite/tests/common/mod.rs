#![allow(dead_code)]

use quarry_orm::{attributes, Config, Database};
use quarry_sqlite::SqliteConnection;

pub const SCHEMA: &str = "
    CREATE TABLE wp_widgets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        qty INTEGER NOT NULL DEFAULT 0,
        price INTEGER,
        deleted_at TEXT
    );
    CREATE TABLE wp_widget_part (
        sku TEXT PRIMARY KEY,
        widget_id INTEGER NOT NULL,
        weight REAL
    );
";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn config() -> Config {
    Config::new("sqlite::memory:").table_prefix("wp_")
}

/// An in-memory database holding the schema and no rows.
pub fn empty_db() -> Database {
    init_tracing();
    let config = config();
    let conn = SqliteConnection::connect_with(&config).expect("Failed to open in-memory SQLite");
    conn.execute_script(SCHEMA).expect("Failed to create schema");
    Database::with_config(conn, &config)
}

/// An in-memory database with Bolt (10), Nut (7) and Washer (2).
pub fn seeded_db() -> Database {
    let db = empty_db();
    db.table("widgets")
        .insert_batch(&[
            attributes! { "name" => "Bolt", "qty" => 10, "price" => 1999 },
            attributes! { "name" => "Nut", "qty" => 7, "price" => 250 },
            attributes! { "name" => "Washer", "qty" => 2, "price" => 5 },
        ])
        .expect("Failed to seed widgets");
    db
}
