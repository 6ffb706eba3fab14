//! Configuration management.
//!
//! This module provides functions for discovering the rowsync workspace,
//! resolving the paths that live inside it, and loading configuration.
//!
//! # Architecture
//!
//! rowsync is **workspace-scoped**: each project carries a `.rowsync/`
//! directory holding `profiles.json` (committed to git) plus the
//! per-workspace session slot and scratch files (ignored). The one
//! global piece of state is the connection credential under
//! `~/.rowsync/`, shared by all workspaces.

pub mod credential;
pub mod profiles;

pub use credential::{clear_credential, credential_path, resolve_dsn, store_credential};
pub use profiles::ProfileDocument;

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};

/// Name of the per-project workspace directory.
pub const WORKSPACE_DIR: &str = ".rowsync";

/// Discover the project-level `.rowsync/` directory.
///
/// Resolution strategy:
/// 1. Check the **git root** first — if the git root has `.rowsync/`, use it.
///    This prevents subdirectory workspaces from shadowing the real project root.
/// 2. Fall back to walking up from CWD (for non-git projects).
#[must_use]
pub fn discover_workspace_dir() -> Option<PathBuf> {
    // Strategy 1: Use git root as the anchor (handles monorepos/subdirectories)
    if let Some(git_root) = git_toplevel() {
        let candidate = git_root.join(WORKSPACE_DIR);
        if candidate.exists() && candidate.is_dir() {
            return Some(candidate);
        }
    }

    // Strategy 2: Walk up from CWD (non-git projects)
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        loop {
            let candidate = dir.join(WORKSPACE_DIR);
            if candidate.exists() && candidate.is_dir() {
                return Some(candidate);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
    }
    None
}

/// Discover the workspace or fail with `NotInitialized`.
pub fn require_workspace_dir() -> Result<PathBuf> {
    discover_workspace_dir().ok_or(Error::NotInitialized)
}

/// Get the git repository root directory.
fn git_toplevel() -> Option<PathBuf> {
    std::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| PathBuf::from(String::from_utf8_lossy(&o.stdout).trim().to_string()))
}

/// The project root a workspace directory belongs to.
///
/// Profiles resolve relative file paths against this.
#[must_use]
pub fn workspace_root(workspace_dir: &Path) -> PathBuf {
    workspace_dir
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Path of the profile document inside a workspace.
#[must_use]
pub fn profiles_path(workspace_dir: &Path) -> PathBuf {
    workspace_dir.join("profiles.json")
}

/// Path of the persisted session slot inside a workspace.
#[must_use]
pub fn session_path(workspace_dir: &Path) -> PathBuf {
    workspace_dir.join("session.json")
}

/// Directory holding scratch copies inside a workspace.
#[must_use]
pub fn scratch_dir(workspace_dir: &Path) -> PathBuf {
    workspace_dir.join("scratch")
}

/// Get the global rowsync directory location (`~/.rowsync/`).
///
/// Holds the connection credential, shared across workspaces.
#[must_use]
pub fn global_rowsync_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(WORKSPACE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_paths() {
        let ws = Path::new("/work/.rowsync");
        assert_eq!(workspace_root(ws), PathBuf::from("/work"));
        assert_eq!(profiles_path(ws), PathBuf::from("/work/.rowsync/profiles.json"));
        assert_eq!(session_path(ws), PathBuf::from("/work/.rowsync/session.json"));
        assert_eq!(scratch_dir(ws), PathBuf::from("/work/.rowsync/scratch"));
    }

    #[test]
    fn test_global_rowsync_dir_returns_some() {
        let result = global_rowsync_dir();
        assert!(result.is_some());
        assert!(result.unwrap().ends_with(".rowsync"));
    }
}
