mod common;

use quarry_orm::{attributes, Config, SqlValue};

#[test]
fn test_file_database_survives_reconnect() {
    common::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("shop.db").display());
    let config = Config::new(url).table_prefix("wp_").max_connections(2);

    {
        let conn = quarry_sqlite::SqliteConnection::connect_with(&config).unwrap();
        conn.execute_script(common::SCHEMA).unwrap();
        let db = quarry_orm::Database::with_config(conn, &config);
        db.table("widgets")
            .insert(&attributes! { "name" => "Bolt", "qty" => 10 })
            .unwrap();
    }

    let db = quarry_sqlite::connect(&config).unwrap();
    let row = db.table("widgets").find_or_fail(1).unwrap();
    assert_eq!(row.get("name"), Some(SqlValue::Text("Bolt".into())));
}

#[test]
fn test_connect_rejects_bad_url() {
    let err = quarry_sqlite::connect(&Config::new("sqlite:///nonexistent-quarry-dir/nested/shop.db")).unwrap_err();
    assert!(matches!(err, quarry_sqlite::SqliteError::Sqlx(_)));
}
