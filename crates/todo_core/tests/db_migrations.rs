use rusqlite::Connection;
use todo_core::db::migrations::latest_version;
use todo_core::db::{open_db, open_db_in_memory, DbError};
use todo_core::{
    RestoreOutcome, SqliteStorage, StorageBackend, StorageError, StoreConfig, TodoStore,
};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let storage_err = SqliteStorage::open(&path).err().unwrap();
    assert!(matches!(
        storage_err,
        StorageError::Db(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn open_failure_names_the_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("todo.db");

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Open { path: failed, .. } => assert_eq!(failed, &path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("missing-dir"));
}

#[test]
fn entry_failure_names_the_storage_key() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    storage
        .connection()
        .execute_batch("DROP TABLE kv_entries;")
        .unwrap();

    let err = storage.set("todos", "[]").unwrap_err();
    assert!(matches!(
        err,
        StorageError::Db(DbError::Entry { ref key, .. }) if key == "todos"
    ));

    let mut store = TodoStore::new(storage, StoreConfig::default());
    match store.restore() {
        RestoreOutcome::Discarded { reason } => assert!(reason.contains("`todos`")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
