//! Connection credential storage.
//!
//! The credential is a single connection string (a SQLite DSN/path for
//! the remote record database). It never lives in `profiles.json`; it is
//! kept in a mode-0600 file under `~/.rowsync/` so the profile document
//! can be committed to git safely.
//!
//! # Resolution Strategy
//!
//! 1. Explicit `--dsn` flag
//! 2. `ROWSYNC_DSN` environment variable
//! 3. Credential file `~/.rowsync/credential`
//! 4. `MissingCredential` — no fallback, no guessing
//!
//! Each CLI invocation opens a fresh transport handle, so rewriting the
//! credential file takes effect on the next command.

use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

use crate::config::global_rowsync_dir;
use crate::error::{Error, Result};

/// Path of the credential file, if a home directory can be determined.
#[must_use]
pub fn credential_path() -> Option<PathBuf> {
    global_rowsync_dir().map(|dir| dir.join("credential"))
}

/// Resolve the connection string for this invocation.
///
/// # Errors
///
/// Returns `MissingCredential` when no source in the priority chain
/// yields a non-empty value.
pub fn resolve_dsn(explicit: Option<&str>) -> Result<String> {
    // 1. Explicit DSN from CLI flag
    if let Some(dsn) = explicit {
        if !dsn.trim().is_empty() {
            return Ok(dsn.trim().to_string());
        }
    }

    // 2. ROWSYNC_DSN environment variable
    if let Ok(dsn) = std::env::var("ROWSYNC_DSN") {
        if !dsn.trim().is_empty() {
            return Ok(dsn.trim().to_string());
        }
    }

    // 3. Credential file
    if let Some(dsn) = read_credential_file() {
        return Ok(dsn);
    }

    Err(Error::MissingCredential)
}

/// Read the stored credential, if any.
#[must_use]
pub fn read_credential_file() -> Option<String> {
    let path = credential_path()?;
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Store the credential with restrictive permissions.
///
/// Writes to a temp file first, then renames into place so concurrent
/// readers never see a partial credential.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or any
/// file operation fails.
pub fn store_credential(dsn: &str) -> Result<PathBuf> {
    let path = credential_path()
        .ok_or_else(|| Error::Config("could not determine home directory".to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut opts = fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(0o600);
        let mut file = opts.open(&temp_path)?;
        file.write_all(dsn.trim().as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
    }
    fs::rename(&temp_path, &path)?;

    Ok(path)
}

/// Remove the stored credential.
///
/// Returns `true` if a credential file was deleted, `false` if none existed.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_credential() -> Result<bool> {
    let Some(path) = credential_path() else {
        return Ok(false);
    };

    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dsn_wins() {
        let dsn = resolve_dsn(Some("  /tmp/remote.db  ")).unwrap();
        assert_eq!(dsn, "/tmp/remote.db");
    }

    #[test]
    fn test_empty_explicit_dsn_falls_through() {
        // An all-whitespace flag value must not shadow the chain; with no
        // env/file configured in the test environment this may still
        // resolve from a developer's real credential file, so only check
        // that it never resolves to the empty string.
        match resolve_dsn(Some("   ")) {
            Ok(dsn) => assert!(!dsn.is_empty()),
            Err(e) => assert!(matches!(e, Error::MissingCredential)),
        }
    }
}
