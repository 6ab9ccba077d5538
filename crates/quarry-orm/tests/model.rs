mod common;

use common::{database, widgets};
use quarry_orm::{attributes, Accessors, GetterInput, Model, OrmError, SqlValue};

struct WidgetPart;

impl Model for WidgetPart {
    fn accessors(accessors: Accessors) -> Accessors {
        accessors
            .getter("price", |input| match input {
                GetterInput::Stored(value) => value
                    .as_f64()
                    .map_or(SqlValue::Null, |cents| SqlValue::Float(cents / 100.0)),
                GetterInput::Row(_) => SqlValue::Null,
            })
            .getter("label", |input| match input {
                GetterInput::Row(row) => {
                    let name = row.raw("name").map(ToString::to_string).unwrap_or_default();
                    let qty = row.raw("qty").map(ToString::to_string).unwrap_or_default();
                    SqlValue::Text(format!("{name} x{qty}"))
                }
                GetterInput::Stored(value) => value.clone(),
            })
            .setter("name", |attributes, value| {
                let name = value.as_str().unwrap_or_default().trim().to_string();
                attributes.insert("slug".to_string(), SqlValue::Text(name.to_lowercase()));
                attributes.insert("name".to_string(), SqlValue::Text(name));
            })
    }
}

struct Gear;

impl Model for Gear {
    fn table() -> Option<&'static str> {
        Some("gear_inventory")
    }

    fn primary_key() -> &'static str {
        "gear_id"
    }
}

#[test]
fn test_table_resolved_from_type_name() {
    let fake = widgets();
    let db = database(&fake);
    assert_eq!(db.model::<WidgetPart>().table(), "wp_widget_part");

    let gear = db.model::<Gear>();
    assert_eq!(gear.table(), "wp_gear_inventory");
    assert_eq!(gear.primary_key(), "gear_id");
}

#[test]
fn test_getter_transforms_stored_value() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 1, "name" => "Bolt", "qty" => 3, "price" => 1999 }]);

    let row = db.model::<WidgetPart>().first_or_fail().unwrap();
    assert_eq!(row.get("price"), Some(SqlValue::Float(19.99)));
    assert_eq!(row.raw("price"), Some(&SqlValue::Int(1999)));
    assert_eq!(row.attributes()["price"], SqlValue::Int(1999));
    assert_eq!(row.get("qty"), Some(SqlValue::Int(3)));
    assert_eq!(row.get("colour"), None);
}

#[test]
fn test_getter_computes_virtual_attribute() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 1, "name" => "Bolt", "qty" => 3 }]);

    let row = db.model::<WidgetPart>().first_or_fail().unwrap();
    assert!(row.has("label"));
    assert_eq!(row.get("label"), Some(SqlValue::Text("Bolt x3".into())));
    assert!(!row.attributes().contains_key("label"));
}

#[test]
fn test_setter_only_runs_for_present_attributes() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 1, "name" => "Bolt" }]);

    let mut row = db.model::<WidgetPart>().first_or_fail().unwrap();
    row.set("name", "  Hex Nut ");
    assert_eq!(row.raw("name"), Some(&SqlValue::Text("Hex Nut".into())));
    assert_eq!(row.raw("slug"), Some(&SqlValue::Text("hex nut".into())));

    row.set("qty", 4);
    assert_eq!(row.raw("qty"), Some(&SqlValue::Int(4)));

    fake.push_rows(vec![attributes! { "id" => 2 }]);
    let mut bare = db.model::<WidgetPart>().first_or_fail().unwrap();
    bare.set("name", "  Raw ");
    assert_eq!(bare.raw("name"), Some(&SqlValue::Text("  Raw ".into())));
    assert_eq!(bare.raw("slug"), None);
}

#[test]
fn test_save_writes_every_attribute_by_primary_key() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 7, "name" => "Bolt", "qty" => 10 }]);

    let mut row = db.table("widgets").find_or_fail(7).unwrap();
    row.set("qty", 12);
    assert_eq!(row.save().unwrap(), 1);

    let statement = fake.last_statement();
    assert_eq!(
        statement.sql,
        "UPDATE wp_widgets SET id=?,name=?,qty=? WHERE 1 AND id = ?"
    );
    assert_eq!(
        statement.params,
        [
            SqlValue::Int(7),
            SqlValue::Text("Bolt".into()),
            SqlValue::Int(12),
            SqlValue::Int(7),
        ]
    );
}

#[test]
fn test_update_merges_supplied_attributes() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 7, "name" => "Bolt", "qty" => 10 }]);

    let mut row = db.table("widgets").first_or_fail().unwrap();
    row.update(Some(attributes! { "qty" => 0 })).unwrap();

    assert_eq!(
        fake.last_statement().sql,
        "UPDATE wp_widgets SET qty=? WHERE 1 AND id = ?"
    );
    assert_eq!(row.raw("qty"), Some(&SqlValue::Int(0)));
    assert_eq!(row.raw("name"), Some(&SqlValue::Text("Bolt".into())));
}

#[test]
fn test_update_merges_only_written_columns() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 7, "name" => "Bolt", "qty" => 10 }]);

    let mut row = db.table("widgets").first_or_fail().unwrap();
    row.update(Some(attributes! { "qty" => 4, "colour" => "red" })).unwrap();
    assert_eq!(
        fake.last_statement().sql,
        "UPDATE wp_widgets SET qty=? WHERE 1 AND id = ?"
    );
    assert_eq!(row.raw("qty"), Some(&SqlValue::Int(4)));
    assert!(!row.has("colour"));

    assert!(matches!(
        row.update(Some(attributes! { "colour" => "blue" })),
        Err(OrmError::UnknownColumns { .. })
    ));
    assert!(!row.has("colour"));
}

#[test]
fn test_delete_is_scoped_to_the_row() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 9, "name" => "Washer" }]);

    let row = db.table("widgets").first_or_fail().unwrap();
    row.delete().unwrap();
    let statement = fake.last_statement();
    assert_eq!(statement.sql, "DELETE FROM wp_widgets WHERE 1 AND id = ?");
    assert_eq!(statement.params, [SqlValue::Int(9)]);
}

#[test]
fn test_missing_primary_key_blocks_persistence() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![
        attributes! { "name" => "Orphan" },
        attributes! { "id" => SqlValue::Null, "name" => "Ghost" },
    ]);

    let rows = db.table("widgets").select(&["name"]).all().unwrap();
    let before = fake.statements().len();
    for mut row in rows {
        assert!(matches!(
            row.save(),
            Err(OrmError::MissingPrimaryKey { ref key }) if key == "id"
        ));
        assert!(matches!(row.delete(), Err(OrmError::MissingPrimaryKey { .. })));
        assert!(matches!(row.refresh(), Err(OrmError::MissingPrimaryKey { .. })));
    }
    assert_eq!(fake.statements().len(), before);
}

#[test]
fn test_refresh_reloads_attributes() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![attributes! { "id" => 3, "qty" => 1 }]);
    fake.push_rows(vec![attributes! { "id" => 3, "qty" => 5 }]);

    let mut row = db.table("widgets").first_or_fail().unwrap();
    row.refresh().unwrap();
    assert_eq!(row.raw("qty"), Some(&SqlValue::Int(5)));
    assert_eq!(
        fake.last_statement().sql,
        "SELECT * FROM wp_widgets WHERE 1 AND id = ? LIMIT 1"
    );

    assert!(matches!(row.refresh(), Err(OrmError::RowNotFound)));
}

#[test]
fn test_json_uses_raw_attributes() {
    let fake = widgets();
    let db = database(&fake);
    fake.push_rows(vec![
        attributes! { "id" => 1, "name" => "Bolt", "price" => 1999 },
        attributes! { "id" => 2, "name" => "Nut", "price" => SqlValue::Null },
    ]);

    let rows = db.model::<WidgetPart>().all().unwrap();
    assert_eq!(
        rows.to_json().unwrap(),
        r#"[{"id":1,"name":"Bolt","price":1999},{"id":2,"name":"Nut","price":null}]"#
    );
    assert_eq!(
        rows.first().unwrap().to_json().unwrap(),
        r#"{"id":1,"name":"Bolt","price":1999}"#
    );
    assert_eq!(rows.last().unwrap().get("name"), Some(SqlValue::Text("Nut".into())));
    assert!(rows.to_json_pretty().unwrap().contains("\n"));
}
