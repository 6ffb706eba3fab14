//! Remote record table access.
//!
//! The record store is the transport seam: the orchestrator only sees
//! the [`RecordStore`] trait, and the default backend is SQLite over
//! `rusqlite`, addressed by the connection string from the credential
//! chain.

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteRecordStore;

use crate::error::Result;
use crate::model::{Record, TableName};

/// Key-value-like access to remote record tables.
///
/// Rows are addressed by `(table, id)`. Fetching from a table that does
/// not exist reads as "no record"; upserting creates the table on first
/// write so first-time uploads work against an empty database.
pub trait RecordStore {
    /// Fetch the record at `(table, id)`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    fn fetch(&mut self, table: &TableName, id: &str) -> Result<Option<Record>>;

    /// Insert or overwrite the record at `(table, id)`.
    ///
    /// On conflict only `data` and `update_time` change; `create_time`
    /// is set once on insert. Returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    fn upsert(&mut self, table: &TableName, id: &str, data: &str) -> Result<Record>;
}
