//! The remote record row.

use serde::{Deserialize, Serialize};

/// One row of a remote record table.
///
/// `data` is an arbitrary raw text blob; timestamps are epoch seconds.
/// An upsert on id conflict overwrites `data` and `update_time` only,
/// `create_time` is set once on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub data: String,
    pub create_time: i64,
    pub update_time: i64,
}
