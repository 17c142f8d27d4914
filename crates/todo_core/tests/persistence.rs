use chrono::NaiveDate;
use todo_core::{
    Filter, MemoryStorage, RestoreOutcome, SqliteStorage, StorageBackend, StoreConfig, TodoError,
    TodoStore,
};

const KEY: &str = "todos";

#[test]
fn restore_of_persisted_list_is_identical() {
    let mut store = TodoStore::new(MemoryStorage::new(), StoreConfig::default());
    let first = store.create("Buy milk", "2024-01-15").unwrap();
    store.create("Walk dog", "2024-02-29").unwrap();
    store.create("File taxes", "2024-04-01").unwrap();
    store.toggle(first.id).unwrap();
    let expected = store.items().to_vec();

    let mut reopened = TodoStore::new(store.into_storage(), StoreConfig::default());
    assert_eq!(reopened.restore(), RestoreOutcome::Restored { count: 3 });
    assert_eq!(reopened.items(), expected.as_slice());
}

#[test]
fn restore_missing_key_yields_empty_list() {
    let mut store = TodoStore::new(MemoryStorage::new(), StoreConfig::default());
    assert_eq!(store.restore(), RestoreOutcome::Missing);
    assert!(store.is_empty());
}

#[test]
fn restore_corrupt_blob_yields_empty_list_and_keeps_blob() {
    for raw in ["{not json", "null", r#"{"id":1}"#, r#"[{"id":1,"text":"x"}]"#] {
        let storage = MemoryStorage::new().with_entry(KEY, raw);
        let mut store = TodoStore::new(storage, StoreConfig::default());

        let outcome = store.restore();
        assert!(
            matches!(outcome, RestoreOutcome::Discarded { .. }),
            "blob {raw} should be discarded, got {outcome:?}"
        );
        assert!(store.is_empty());
        assert_eq!(store.storage().get(KEY).unwrap().as_deref(), Some(raw));
    }
}

#[test]
fn restore_reads_blob_written_by_the_web_widget() {
    let raw = r#"[
        {"id":1705312800000,"text":"Buy milk","date":"2024-01-15","completed":false,"createdAt":"2024-01-15T10:00:00.000Z"},
        {"id":1705312900000,"text":"<b>bold</b>","date":"2024-01-16","completed":true,"createdAt":"2024-01-15T10:01:40.000Z"}
    ]"#;
    let storage = MemoryStorage::new().with_entry(KEY, raw);
    let mut store = TodoStore::open(storage, StoreConfig::default());

    assert_eq!(store.len(), 2);
    let first = &store.items()[0];
    assert_eq!(first.id, 1_705_312_800_000);
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert_eq!(store.list(Filter::Completed)[0].text, "<b>bold</b>");

    let created = store.create("next", "2024-01-17").unwrap();
    assert!(created.id > 1_705_312_900_000);
}

#[test]
fn new_ids_never_collide_with_restored_future_ids() {
    let far_future = i64::MAX / 2;
    let raw = format!(
        r#"[{{"id":{far_future},"text":"imported","date":"2024-01-15","completed":false,"createdAt":"2024-01-15T10:00:00Z"}}]"#
    );
    let storage = MemoryStorage::new().with_entry(KEY, raw);
    let mut store = TodoStore::open(storage, StoreConfig::default());

    let created = store.create("fresh", "2024-01-15").unwrap();
    assert_eq!(created.id, far_future + 1);
}

#[test]
fn restored_max_id_exhausts_ids_without_wrapping() {
    let raw = format!(
        r#"[{{"id":{},"text":"imported","date":"2024-01-15","completed":false,"createdAt":"2024-01-15T10:00:00Z"}}]"#,
        i64::MAX
    );
    let storage = MemoryStorage::new().with_entry(KEY, raw.clone());
    let mut store = TodoStore::open(storage, StoreConfig::default());
    assert_eq!(store.len(), 1);

    let err = store.create("fresh", "2024-01-15").unwrap_err();
    assert!(matches!(err, TodoError::IdsExhausted));
    assert!(!err.is_silent());
    assert_eq!(err.code(), "ids_exhausted");
    assert_eq!(store.len(), 1);
    assert_eq!(store.storage().get(KEY).unwrap(), Some(raw));

    let imported = store.items()[0].id;
    assert!(store.toggle(imported).unwrap().completed);
    assert!(store.delete(imported).unwrap());
}

#[test]
fn blob_uses_camel_case_wire_fields() {
    let mut store = TodoStore::new(MemoryStorage::new(), StoreConfig::default());
    let item = store.create("<script>alert(1)</script>", "2024-01-15").unwrap();

    let blob = store.storage().get(KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let record = &json[0];
    assert_eq!(record["id"], item.id);
    assert_eq!(record["text"], "<script>alert(1)</script>");
    assert_eq!(record["date"], "2024-01-15");
    assert_eq!(record["completed"], false);
    assert!(record["createdAt"].is_string());
    assert!(record.get("created_at").is_none());
}

#[test]
fn custom_storage_key_is_honored() {
    let config = StoreConfig {
        storage_key: "work-todos".to_string(),
        ..StoreConfig::default()
    };
    let mut store = TodoStore::new(MemoryStorage::new(), config);
    store.create("ship release", "2024-03-01").unwrap();

    assert!(store.storage().get("work-todos").unwrap().is_some());
    assert!(store.storage().get(KEY).unwrap().is_none());
}

#[test]
fn sqlite_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");

    let expected = {
        let storage = SqliteStorage::open(&path).unwrap();
        let mut store = TodoStore::open(storage, StoreConfig::default());
        let item = store.create("Buy milk", "2024-01-15").unwrap();
        store.create("Walk dog", "2024-01-16").unwrap();
        store.toggle(item.id).unwrap();
        store.items().to_vec()
    };

    let storage = SqliteStorage::open(&path).unwrap();
    let store = TodoStore::open(storage, StoreConfig::default());
    assert_eq!(store.items(), expected.as_slice());
}

#[test]
fn sqlite_storage_upserts_single_row_per_key() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();
    storage.set(KEY, "[]").unwrap();
    storage.set(KEY, "[1]").unwrap();
    storage.set("other", "x").unwrap();

    let rows: i64 = storage
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM kv_entries WHERE key = ?1;",
            [KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(storage.get(KEY).unwrap().as_deref(), Some("[1]"));

    storage.remove(KEY).unwrap();
    assert_eq!(storage.get(KEY).unwrap(), None);
    assert_eq!(storage.get("other").unwrap().as_deref(), Some("x"));
}
