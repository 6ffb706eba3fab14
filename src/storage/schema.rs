//! Record table schema.
//!
//! Every record table shares the same four-column shape. Table names
//! reach this module only as validated [`TableName`]s, which is what
//! makes splicing them into DDL/DML text safe.

use rusqlite::Connection;

use crate::model::TableName;

/// DDL for one record table.
///
/// Timestamps are stored as INTEGER epoch seconds.
#[must_use]
pub fn record_table_ddl(table: &TableName) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    \
             id TEXT PRIMARY KEY,\n    \
             data TEXT NOT NULL,\n    \
             create_time INTEGER NOT NULL,\n    \
             update_time INTEGER NOT NULL\n\
         )"
    )
}

/// Create the record table if it does not exist yet.
pub fn ensure_record_table(conn: &Connection, table: &TableName) -> rusqlite::Result<()> {
    conn.execute_batch(&record_table_ddl(table))
}

/// Check whether a record table exists.
///
/// Schema-qualified names are checked by their bare table segment.
pub fn table_exists(conn: &Connection, table: &TableName) -> rusqlite::Result<bool> {
    let bare = table.as_str().rsplit('.').next().unwrap_or(table.as_str());
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    stmt.exists([bare])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_and_exists() {
        let conn = Connection::open_in_memory().unwrap();
        let table = TableName::new("json_records").unwrap();

        assert!(!table_exists(&conn, &table).unwrap());
        ensure_record_table(&conn, &table).unwrap();
        assert!(table_exists(&conn, &table).unwrap());

        // Idempotent
        ensure_record_table(&conn, &table).unwrap();
    }

    #[test]
    fn test_schema_qualified_name() {
        let conn = Connection::open_in_memory().unwrap();
        let table = TableName::new("main.json_records").unwrap();

        ensure_record_table(&conn, &table).unwrap();
        assert!(table_exists(&conn, &table).unwrap());
    }
}
