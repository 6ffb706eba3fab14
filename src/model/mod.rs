//! Data models for rowsync.
//!
//! This module contains the domain models:
//! - Profile (a named file ⟷ record mapping)
//! - TableName (validated table identifier)
//! - Record (one remote row)

pub mod profile;
pub mod record;

pub use profile::{Profile, TableName};
pub use record::Record;
