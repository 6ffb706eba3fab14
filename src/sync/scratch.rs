//! Scratch copies: the two on-disk sides of a comparison.
//!
//! Scratch files are owned exclusively by the session that created them
//! and deleted when it ends. Creation is effectively atomic for the
//! pair: if the second copy cannot be written, the first is removed and
//! no session is registered.
//!
//! # Naming
//!
//! `<profile>-<direction>-<UTC timestamp>-<pid>-<seq>.<side>.<ext>`
//!
//! The timestamp/pid/seq triple keeps names unique across rapid
//! repeated invocations; the side is `local` or `remote`; the original
//! file's extension is carried over so a comparison view renders both
//! copies with the same content-type hint as the real file. A missing
//! extension just omits that suffix (the hint is best-effort).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::debug;

use crate::error::Result;
use crate::model::Profile;
use crate::sync::session::SyncDirection;

/// Process-local tiebreaker for starts within the same second.
static SEQ: AtomicU64 = AtomicU64::new(0);

/// The two scratch copies of one session, mapped to their roles.
#[derive(Debug, Clone)]
pub struct ScratchPair {
    /// Shared stem of both file names; becomes the session id.
    pub id: String,
    pub reference_path: PathBuf,
    pub candidate_path: PathBuf,
}

/// Write content to a file atomically.
///
/// Writes to a temporary sibling (`.tmp` suffix), syncs it to disk,
/// then renames over the target. If any step fails, the original file
/// (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_sibling(path);
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&temp_path, path)?;

    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    name.push_str(".tmp");
    path.with_file_name(name)
}

/// Build the unique stem for one invocation.
fn session_stamp(profile: &Profile, direction: SyncDirection) -> String {
    let ts = Utc::now().format("%Y%m%dT%H%M%S");
    let pid = std::process::id();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{ts}-{pid}-{seq}", profile.name, direction)
}

/// One side's file name: stem, side label, original extension.
fn scratch_file_name(stem: &str, side: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{stem}.{side}.{ext}"),
        None => format!("{stem}.{side}"),
    }
}

/// Materialize the two scratch copies for a session.
///
/// Download: reference = local content, candidate = remote content.
/// Upload: reference = remote content, candidate = local content.
///
/// # Errors
///
/// Returns an error if either copy cannot be written; a partially
/// written pair is removed before returning.
pub fn materialize_pair(
    scratch_dir: &Path,
    profile: &Profile,
    direction: SyncDirection,
    local_content: &str,
    remote_content: &str,
) -> Result<ScratchPair> {
    let stem = session_stamp(profile, direction);
    let extension = profile
        .file_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());

    let local_path = scratch_dir.join(scratch_file_name(&stem, "local", extension.as_deref()));
    let remote_path = scratch_dir.join(scratch_file_name(&stem, "remote", extension.as_deref()));

    atomic_write(&local_path, local_content)?;
    if let Err(e) = atomic_write(&remote_path, remote_content) {
        let _ = fs::remove_file(&local_path);
        return Err(e);
    }
    debug!(stem, "materialized scratch pair");

    let (reference_path, candidate_path) = match direction {
        SyncDirection::Download => (local_path, remote_path),
        SyncDirection::Upload => (remote_path, local_path),
    };

    Ok(ScratchPair {
        id: stem,
        reference_path,
        candidate_path,
    })
}

/// Remove one scratch copy; already-gone is fine.
pub fn remove_scratch_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove scratch file");
        }
    }
}

/// Remove both sides of a pair.
pub fn remove_pair(pair: &ScratchPair) {
    remove_scratch_file(&pair.reference_path);
    remove_scratch_file(&pair.candidate_path);
}
