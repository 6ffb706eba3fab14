//! The profile document.
//!
//! Profiles are persisted as a single JSON document inside the
//! workspace: `{"profiles": [{...}, ...]}`. The document is loaded
//! whole, mutated in memory, and written back atomically (temp file +
//! rename) so a crash never leaves a half-written profile list.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Profile;
use crate::validate::{find_similar_names, is_valid_profile_name};

/// The JSON profile document: `{"profiles": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub profiles: Vec<Profile>,
}

impl ProfileDocument {
    /// Load the document from `path`.
    ///
    /// A missing file reads as an empty document; workspace discovery
    /// already gates on `.rowsync/` existing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed (including
    /// an invalid table name inside any profile).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the document to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any file operation fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            let json = serde_json::to_string_pretty(self)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// All profile names, in document order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    /// Resolve a profile by name.
    ///
    /// # Errors
    ///
    /// Returns `ProfileNotFound`, enriched with near-miss suggestions
    /// when similarly named profiles exist.
    pub fn find(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| self.not_found(name))
    }

    /// Add a new profile.
    ///
    /// # Errors
    ///
    /// Returns `ProfileExists` for a duplicate name and `Config` for a
    /// name that would not embed cleanly in scratch file names.
    pub fn add(&mut self, profile: Profile) -> Result<()> {
        if !is_valid_profile_name(&profile.name) {
            return Err(Error::Config(format!(
                "invalid profile name: {:?} (use letters, digits, '-', '_')",
                profile.name
            )));
        }
        if self.profiles.iter().any(|p| p.name == profile.name) {
            return Err(Error::ProfileExists { name: profile.name });
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Remove a profile by name, returning it.
    ///
    /// # Errors
    ///
    /// Returns `ProfileNotFound` (with suggestions) if absent.
    pub fn remove(&mut self, name: &str) -> Result<Profile> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| self.not_found(name))?;
        Ok(self.profiles.remove(index))
    }

    fn not_found(&self, name: &str) -> Error {
        let similar = find_similar_names(name, &self.names(), 3);
        if similar.is_empty() {
            Error::ProfileNotFound {
                name: name.to_string(),
            }
        } else {
            Error::ProfileNotFoundSimilar {
                name: name.to_string(),
                similar,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableName;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            file_path: PathBuf::from(format!("{name}.json")),
            id: format!("{name}-id"),
            table_name: TableName::new("json_records").unwrap(),
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let doc = ProfileDocument::load(Path::new("/nonexistent/profiles.json")).unwrap();
        assert!(doc.profiles.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles.json");

        let mut doc = ProfileDocument::default();
        doc.add(make_profile("cfg")).unwrap();
        doc.add(make_profile("notes")).unwrap();
        doc.save(&path).unwrap();

        let loaded = ProfileDocument::load(&path).unwrap();
        assert_eq!(loaded.profiles.len(), 2);
        assert_eq!(loaded.find("cfg").unwrap().id, "cfg-id");
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut doc = ProfileDocument::default();
        doc.add(make_profile("cfg")).unwrap();
        assert!(matches!(
            doc.add(make_profile("cfg")),
            Err(Error::ProfileExists { .. })
        ));
    }

    #[test]
    fn test_not_found_suggests_similar() {
        let mut doc = ProfileDocument::default();
        doc.add(make_profile("cfg")).unwrap();

        match doc.find("cfh") {
            Err(Error::ProfileNotFoundSimilar { similar, .. }) => {
                assert!(similar.contains(&"cfg".to_string()));
            }
            other => panic!("expected similar-name error, got {other:?}"),
        }
    }

    #[test]
    fn test_remove() {
        let mut doc = ProfileDocument::default();
        doc.add(make_profile("cfg")).unwrap();
        let removed = doc.remove("cfg").unwrap();
        assert_eq!(removed.name, "cfg");
        assert!(doc.profiles.is_empty());
        assert!(doc.remove("cfg").is_err());
    }

    #[test]
    fn test_invalid_name_rejected() {
        let mut doc = ProfileDocument::default();
        let mut bad = make_profile("ok");
        bad.name = "has space".to_string();
        assert!(matches!(doc.add(bad), Err(Error::Config(_))));
    }
}
