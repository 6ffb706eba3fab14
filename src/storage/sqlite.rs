//! SQLite record store implementation.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::model::{Record, TableName};
use crate::storage::schema::{ensure_record_table, table_exists};
use crate::storage::RecordStore;

/// Record store backed by a SQLite database.
///
/// The connection string from the credential chain is a path (or SQLite
/// URI) to the remote database file. One handle is opened per CLI
/// invocation; credential changes are picked up on the next open.
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open the record database behind a connection string.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open(dsn: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(dsn))?;
        // Default 5 second timeout
        conn.busy_timeout(Duration::from_secs(5))?;
        debug!(dsn, "opened record store");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn fetch_row(&self, table: &TableName, id: &str) -> Result<Option<Record>> {
        let sql = format!(
            "SELECT id, data, create_time, update_time FROM {table} WHERE id = ?1"
        );
        let record = self
            .conn
            .query_row(&sql, [id], |row| {
                Ok(Record {
                    id: row.get(0)?,
                    data: row.get(1)?,
                    create_time: row.get(2)?,
                    update_time: row.get(3)?,
                })
            })
            .optional()?;
        Ok(record)
    }

    /// Upsert with an explicit timestamp; `upsert` passes the wall clock.
    fn upsert_at(&mut self, table: &TableName, id: &str, data: &str, now: i64) -> Result<Record> {
        ensure_record_table(&self.conn, table)?;

        let sql = format!(
            "INSERT INTO {table} (id, data, create_time, update_time) \
             VALUES (?1, ?2, ?3, ?3) \
             ON CONFLICT(id) DO UPDATE SET \
                 data = excluded.data, \
                 update_time = excluded.update_time"
        );
        self.conn
            .execute(&sql, rusqlite::params![id, data, now])?;
        debug!(table = %table, id, "upserted record");

        self.fetch_row(table, id)?
            .ok_or_else(|| crate::error::Error::Other(format!("upserted row vanished: {id}")))
    }
}

impl RecordStore for SqliteRecordStore {
    fn fetch(&mut self, table: &TableName, id: &str) -> Result<Option<Record>> {
        // A missing table reads as "no record", so a first download
        // against a fresh database is a stop condition, not an error.
        if !table_exists(&self.conn, table)? {
            return Ok(None);
        }
        self.fetch_row(table, id)
    }

    fn upsert(&mut self, table: &TableName, id: &str, data: &str) -> Result<Record> {
        self.upsert_at(table, id, data, Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableName {
        TableName::new("json_records").unwrap()
    }

    #[test]
    fn test_fetch_missing_table_is_none() {
        let mut store = SqliteRecordStore::open_memory().unwrap();
        assert_eq!(store.fetch(&table(), "app-settings").unwrap(), None);
    }

    #[test]
    fn test_upsert_insert_then_fetch() {
        let mut store = SqliteRecordStore::open_memory().unwrap();
        let record = store
            .upsert(&table(), "app-settings", "{\n  \"a\": 1\n}")
            .unwrap();
        assert_eq!(record.data, "{\n  \"a\": 1\n}");
        assert_eq!(record.create_time, record.update_time);

        let fetched = store.fetch(&table(), "app-settings").unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[test]
    fn test_upsert_conflict_updates_data_and_update_time_only() {
        let mut store = SqliteRecordStore::open_memory().unwrap();
        let t = table();
        store.upsert_at(&t, "app-settings", "v1", 1_000).unwrap();
        let updated = store.upsert_at(&t, "app-settings", "v2", 2_000).unwrap();

        assert_eq!(updated.data, "v2");
        assert_eq!(updated.create_time, 1_000);
        assert_eq!(updated.update_time, 2_000);
    }

    #[test]
    fn test_rows_keyed_by_id() {
        let mut store = SqliteRecordStore::open_memory().unwrap();
        let t = table();
        store.upsert(&t, "a", "alpha").unwrap();
        store.upsert(&t, "b", "beta").unwrap();

        assert_eq!(store.fetch(&t, "a").unwrap().unwrap().data, "alpha");
        assert_eq!(store.fetch(&t, "b").unwrap().unwrap().data, "beta");
        assert_eq!(store.fetch(&t, "c").unwrap(), None);
    }
}
