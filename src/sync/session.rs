//! The sync session entity and its persisted slot.
//!
//! A `SyncSession` tracks one in-progress sync from start to
//! confirm/cancel. The orchestrator holds it in memory; because CLI
//! invocations are discrete events, the slot is also persisted as
//! `session.json` inside the workspace, written atomically (temp file +
//! rename) so a crash never leaves a torn slot.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Profile;

/// Which way content flows on confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// Remote record → local file. The candidate is the remote-derived copy.
    Download,
    /// Local file → remote record (mirrored back to the local file).
    /// The candidate is the local-derived copy.
    Upload,
}

impl SyncDirection {
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Re-entrancy tag for cleanup.
///
/// Cleanup checks the tag instead of relying on the slot reference
/// already being cleared, so racing cleanup paths stay a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Closed,
}

/// One in-progress sync operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSession {
    /// `<profile>-<direction>-<timestamp>-<pid>-<seq>`, shared with the
    /// scratch file names.
    pub id: String,
    pub direction: SyncDirection,
    /// Owned copy of the driving profile; immutable for the session.
    pub profile: Profile,
    /// Scratch copy of the reference side (read-only in spirit).
    pub reference_path: PathBuf,
    /// Scratch copy the user may edit; written to the destination on confirm.
    pub candidate_path: PathBuf,
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
}

impl SyncSession {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Comparison-view title: names the direction, the profile, and
    /// which side is the candidate.
    #[must_use]
    pub fn title(&self) -> String {
        match self.direction {
            SyncDirection::Download => format!(
                "download '{}': local file (reference) vs remote record (candidate)",
                self.profile.name
            ),
            SyncDirection::Upload => format!(
                "upload '{}': remote record (reference) vs local file (candidate)",
                self.profile.name
            ),
        }
    }
}

// ── Persisted slot ───────────────────────────────────────────

/// Read the persisted session slot.
///
/// # Errors
///
/// Returns an error if the slot file exists but cannot be read or parsed.
pub fn load_slot(path: &Path) -> Result<Option<SyncSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Write the session slot atomically.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn store_slot(path: &Path, session: &SyncSession) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&temp_path)?;
        let json = serde_json::to_string_pretty(session)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Remove the session slot. Already-clear is fine.
///
/// # Errors
///
/// Returns an error if the slot file exists but cannot be removed.
pub fn clear_slot(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableName;
    use tempfile::TempDir;

    fn make_session() -> SyncSession {
        SyncSession {
            id: "cfg-download-20250101T120000-42-0".to_string(),
            direction: SyncDirection::Download,
            profile: Profile {
                name: "cfg".into(),
                file_path: PathBuf::from("settings.json"),
                id: "app-settings".into(),
                table_name: TableName::new("json_records").unwrap(),
            },
            reference_path: PathBuf::from("/tmp/ref"),
            candidate_path: PathBuf::from("/tmp/cand"),
            state: SessionState::Active,
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_slot_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        assert!(load_slot(&path).unwrap().is_none());

        let session = make_session();
        store_slot(&path, &session).unwrap();

        let loaded = load_slot(&path).unwrap().unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.direction, SyncDirection::Download);
        assert!(loaded.is_active());
    }

    #[test]
    fn test_clear_slot_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        store_slot(&path, &make_session()).unwrap();
        clear_slot(&path).unwrap();
        assert!(load_slot(&path).unwrap().is_none());

        // Clearing an already-clear slot is a no-op
        clear_slot(&path).unwrap();
    }

    #[test]
    fn test_title_names_candidate_side() {
        let mut session = make_session();
        assert!(session.title().contains("remote record (candidate)"));

        session.direction = SyncDirection::Upload;
        assert!(session.title().contains("local file (candidate)"));
    }
}
