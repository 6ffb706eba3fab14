//! Sync profiles: the named mapping between a local file and a remote record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::validate::is_valid_table_name;

/// A validated table identifier.
///
/// Construction is the only place table names are checked; once a
/// `TableName` exists it is safe to splice into query text. Accepts an
/// optional single schema qualifier (`schema.table`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Validate and wrap a table name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTableName` if the name does not match the
    /// identifier grammar.
    pub fn new(name: &str) -> Result<Self, Error> {
        if is_valid_table_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidTableName {
                name: name.to_string(),
            })
        }
    }

    /// The validated identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TableName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named mapping between a local file and a remote record.
///
/// Immutable once loaded for a session. Serialized in `profiles.json`
/// with camelCase keys:
/// `{"name":"cfg","filePath":"settings.json","id":"app-settings","tableName":"json_records"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique, user-facing key.
    pub name: String,
    /// Local file path, relative to the workspace root or absolute.
    pub file_path: PathBuf,
    /// Remote record key.
    pub id: String,
    /// Remote table, validated at load time.
    pub table_name: TableName,
}

impl Profile {
    /// Resolve the profile's file path against the workspace root.
    ///
    /// Absolute paths pass through untouched.
    #[must_use]
    pub fn resolved_file_path(&self, workspace_root: &Path) -> PathBuf {
        if self.file_path.is_absolute() {
            self.file_path.clone()
        } else {
            workspace_root.join(&self.file_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_rejects_injection() {
        assert!(TableName::new("json_records; DROP TABLE x").is_err());
        assert!(TableName::new("json_records").is_ok());
    }

    #[test]
    fn test_profile_json_shape() {
        let json = r#"{
            "name": "cfg",
            "filePath": "settings.json",
            "id": "app-settings",
            "tableName": "json_records"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "cfg");
        assert_eq!(profile.table_name.as_str(), "json_records");

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["filePath"], "settings.json");
        assert_eq!(back["tableName"], "json_records");
    }

    #[test]
    fn test_profile_load_rejects_bad_table() {
        let json = r#"{
            "name": "cfg",
            "filePath": "settings.json",
            "id": "app-settings",
            "tableName": "json_records; DROP TABLE x"
        }"#;
        assert!(serde_json::from_str::<Profile>(json).is_err());
    }

    #[test]
    fn test_resolved_file_path() {
        let profile = Profile {
            name: "cfg".into(),
            file_path: PathBuf::from("settings.json"),
            id: "app-settings".into(),
            table_name: TableName::new("json_records").unwrap(),
        };
        let root = Path::new("/work");
        assert_eq!(
            profile.resolved_file_path(root),
            PathBuf::from("/work/settings.json")
        );

        let abs = Profile {
            file_path: PathBuf::from("/etc/settings.json"),
            ..profile
        };
        assert_eq!(
            abs.resolved_file_path(root),
            PathBuf::from("/etc/settings.json")
        );
    }
}
