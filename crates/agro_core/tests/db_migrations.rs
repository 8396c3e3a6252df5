use agro_core::db::migrations::{apply_migrations, current_user_version, latest_version};
use agro_core::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn fresh_database_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());

    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn migrations_are_idempotent_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agro.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO crop_types (name) VALUES ('Soja');",
            [],
        )
        .unwrap();
    }

    let mut conn = open_db(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM crop_types;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn report_indexes_exist() {
    let conn = open_db_in_memory().unwrap();
    for index in [
        "idx_farms_farmer_id",
        "idx_farms_state",
        "idx_crops_crop_type_id",
        "idx_farms_updated_at",
        "idx_farmers_updated_at",
    ] {
        let found: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1;",
                [index],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(found, 1, "missing index {index}");
    }
}

#[test]
fn area_sum_check_is_enforced_by_schema() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO farmers (id, document, name) VALUES ('f1', '95181040004', 'Ana');",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO farms (
            id, farmer_id, name, city, state,
            total_area_centi, arable_area_centi, vegetation_area_centi
         ) VALUES ('farm1', 'f1', 'Boa Vista', 'Sorriso', 'MT', 10000, 6000, 5000);",
        [],
    );
    assert!(result.is_err());
}
