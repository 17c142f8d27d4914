//! SQLite-backed key-value storage.
//!
//! # Invariants
//! - One row per key in `kv_entries`; writes are upserts.
//! - The connection has migrations applied before it is wrapped.

use super::{StorageBackend, StorageResult};
use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Key-value storage over the `kv_entries` table.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StorageBackend for SqliteStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|source| entry_error(key, source))?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now') * 1000)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )
            .map_err(|source| entry_error(key, source))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])
            .map_err(|source| entry_error(key, source))?;
        Ok(())
    }
}

fn entry_error(key: &str, source: rusqlite::Error) -> DbError {
    DbError::Entry {
        key: key.to_string(),
        source,
    }
}
