//! The sync orchestrator: one session from start to confirm/cancel.
//!
//! The orchestrator owns the single active-session slot as an explicit
//! `Option<SyncSession>` field; every workspace gets its own instance,
//! so there is no process-global state. All mutations of the slot
//! happen inside start/confirm/cancel/reconcile, which the CLI invokes
//! one at a time.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ProfileDocument;
use crate::error::{Error, Result};
use crate::storage::RecordStore;
use crate::sync::scratch::{self, atomic_write};
use crate::sync::session::{SessionState, SyncDirection, SyncSession};
use crate::sync::view::{DiffView, ViewRequest};

/// Maximum candidate excerpt length attached to write-back failures.
const EXCERPT_CHARS: usize = 80;

/// What a start operation concluded.
#[derive(Debug)]
pub enum StartOutcome {
    /// A session is now active and the comparison view is open.
    Started(SyncSession),
    /// Local and remote content are byte-identical; nothing to sync,
    /// no session was created.
    UpToDate,
    /// Download only: the remote record does not exist. A stop
    /// condition, not an error; no session was created.
    RemoteMissing,
}

/// Result of a confirmed sync, for reporting.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub direction: SyncDirection,
    pub profile: String,
    pub table: String,
    pub record_id: String,
    pub local_path: PathBuf,
    pub bytes: usize,
}

/// Drives download/upload sessions over a record store and a diff view.
pub struct Orchestrator<S, V> {
    records: S,
    view: V,
    /// Project root; profiles resolve relative file paths against it.
    workspace_root: PathBuf,
    scratch_dir: PathBuf,
    session: Option<SyncSession>,
}

impl<S: RecordStore, V: DiffView> Orchestrator<S, V> {
    #[must_use]
    pub fn new(records: S, view: V, workspace_root: PathBuf, scratch_dir: PathBuf) -> Self {
        Self {
            records,
            view,
            workspace_root,
            scratch_dir,
            session: None,
        }
    }

    /// The active session, if any. Doubles as the "syncing" flag for
    /// the surrounding UI.
    #[must_use]
    pub fn session(&self) -> Option<&SyncSession> {
        self.session.as_ref()
    }

    /// Attach a session restored from the persisted slot.
    ///
    /// Sessions that were already closed are dropped instead.
    pub fn restore(&mut self, session: SyncSession) {
        if session.is_active() {
            self.session = Some(session);
        }
    }

    /// Detect a comparison view the user closed without confirming or
    /// cancelling, and clean up the session if so.
    ///
    /// Returns `true` when a stale session was cleaned up. Safe to call
    /// at any time; with no session it does nothing.
    pub fn reconcile(&mut self) -> bool {
        let closed_externally = self
            .session
            .as_ref()
            .is_some_and(|s| !self.view.is_open(&s.candidate_path));
        if closed_externally {
            info!("candidate view was closed externally; discarding session");
            self.cleanup();
        }
        closed_externally
    }

    /// Start a download session for the named profile.
    ///
    /// # Errors
    ///
    /// See the shared start path below.
    pub fn start_download(
        &mut self,
        profiles: &ProfileDocument,
        name: &str,
    ) -> Result<StartOutcome> {
        self.start(SyncDirection::Download, profiles, name)
    }

    /// Start an upload session for the named profile.
    ///
    /// # Errors
    ///
    /// See the shared start path below.
    pub fn start_upload(
        &mut self,
        profiles: &ProfileDocument,
        name: &str,
    ) -> Result<StartOutcome> {
        self.start(SyncDirection::Upload, profiles, name)
    }

    /// Shared start path.
    ///
    /// Fetch the remote blob, read the local file, short-circuit when
    /// both sides match, otherwise materialize the scratch pair, open
    /// the comparison view, and register the session. Scratch creation
    /// plus registration is effectively atomic: any failure along the
    /// way removes whatever was written and leaves the slot empty.
    ///
    /// # Errors
    ///
    /// `ProfileNotFound` for an unknown name, `SessionActive` when a
    /// session already holds the slot, `LocalFileMissing` when
    /// uploading without a source file, plus transport/IO failures.
    fn start(
        &mut self,
        direction: SyncDirection,
        profiles: &ProfileDocument,
        name: &str,
    ) -> Result<StartOutcome> {
        let profile = profiles.find(name)?.clone();

        if let Some(active) = &self.session {
            return Err(Error::SessionActive {
                id: active.id.clone(),
            });
        }

        // Fetch before any scratch file exists: a transport failure here
        // aborts with nothing to undo.
        let remote = self.records.fetch(&profile.table_name, &profile.id)?;
        let remote_content = match remote {
            Some(record) => record.data,
            None => match direction {
                SyncDirection::Download => {
                    info!(profile = %profile.name, "remote record does not exist");
                    return Ok(StartOutcome::RemoteMissing);
                }
                // First-time upload: treat the missing record as empty.
                SyncDirection::Upload => String::new(),
            },
        };

        let local_path = profile.resolved_file_path(&self.workspace_root);
        let local_content = match fs::read_to_string(&local_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => match direction {
                SyncDirection::Download => String::new(),
                SyncDirection::Upload => {
                    return Err(Error::LocalFileMissing { path: local_path });
                }
            },
            Err(e) => return Err(e.into()),
        };

        if local_content == remote_content {
            info!(profile = %profile.name, "local and remote are identical; nothing to sync");
            return Ok(StartOutcome::UpToDate);
        }

        let pair = scratch::materialize_pair(
            &self.scratch_dir,
            &profile,
            direction,
            &local_content,
            &remote_content,
        )?;

        let session = SyncSession {
            id: pair.id.clone(),
            direction,
            profile,
            reference_path: pair.reference_path.clone(),
            candidate_path: pair.candidate_path.clone(),
            state: SessionState::Active,
            started_at: chrono::Utc::now(),
        };

        let title = session.title();
        let request = ViewRequest {
            title: &title,
            reference: &session.reference_path,
            candidate: &session.candidate_path,
        };
        if let Err(e) = self.view.open(&request) {
            scratch::remove_pair(&pair);
            return Err(e);
        }

        info!(session = %session.id, "sync session started");
        self.session = Some(session.clone());
        Ok(StartOutcome::Started(session))
    }

    /// Write the candidate content to its destination and end the session.
    ///
    /// The candidate is resolved by flushing any in-memory edits first,
    /// then reading the scratch copy from storage. Once resolution
    /// succeeds, cleanup is guaranteed to run whether the write-back
    /// succeeds or fails.
    ///
    /// # Errors
    ///
    /// `NoActiveSession` when the slot is empty. `UnreadableCandidate`
    /// when the candidate is gone or empty after trimming; the session
    /// then stays active so the user can repair and retry. `WriteBack`
    /// (with a content excerpt) when a destination write fails; the
    /// session is cleaned up regardless.
    pub fn confirm(&mut self) -> Result<SyncReport> {
        let session = self.session.clone().ok_or(Error::NoActiveSession)?;

        // Failing here must NOT destroy the session: the user may have
        // unsynced edits in the candidate worth recovering.
        let content = self.resolve_candidate(&session)?;

        let result = self.write_back(&session, &content);
        self.cleanup();
        result
    }

    /// Discard the active session without writing anything.
    ///
    /// Returns `true` if a session was discarded, `false` for a no-op.
    pub fn cancel(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }
        info!("sync session cancelled");
        self.cleanup();
        true
    }

    /// Authoritative candidate content at confirm time.
    fn resolve_candidate(&mut self, session: &SyncSession) -> Result<String> {
        self.view.flush(&session.candidate_path)?;

        match fs::read_to_string(&session.candidate_path) {
            // Empty-after-trim reads as unreadable rather than as a
            // deliberate empty sync; see DESIGN.md.
            Ok(content) if content.trim().is_empty() => Err(Error::UnreadableCandidate {
                path: session.candidate_path.clone(),
            }),
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::UnreadableCandidate {
                    path: session.candidate_path.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_back(&mut self, session: &SyncSession, content: &str) -> Result<SyncReport> {
        let local_path = session.profile.resolved_file_path(&self.workspace_root);

        match session.direction {
            SyncDirection::Download => {
                atomic_write(&local_path, content)
                    .map_err(|e| write_back_error(&e, content))?;
            }
            SyncDirection::Upload => {
                self.records
                    .upsert(&session.profile.table_name, &session.profile.id, content)
                    .map_err(|e| write_back_error(&e, content))?;
                // Mirror to the local file so both sides converge.
                atomic_write(&local_path, content)
                    .map_err(|e| write_back_error(&e, content))?;
            }
        }

        info!(session = %session.id, bytes = content.len(), "sync confirmed");
        Ok(SyncReport {
            direction: session.direction,
            profile: session.profile.name.clone(),
            table: session.profile.table_name.to_string(),
            record_id: session.profile.id.clone(),
            local_path,
            bytes: content.len(),
        })
    }

    /// End the session: close the view, delete the scratch copies,
    /// clear the slot.
    ///
    /// Idempotent. The `Closed` state tag guards re-entry on a session
    /// object that somehow comes back through `restore`; once the slot
    /// is taken, a second invocation sees an empty slot and returns.
    fn cleanup(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if session.state == SessionState::Closed {
            return;
        }
        session.state = SessionState::Closed;

        // Skip the close call when the view is already gone (external close).
        if self.view.is_open(&session.candidate_path) {
            self.view.close(&session.candidate_path);
        }

        scratch::remove_scratch_file(&session.reference_path);
        scratch::remove_scratch_file(&session.candidate_path);
        debug!(session = %session.id, "session cleaned up");
    }
}

fn write_back_error(err: &Error, content: &str) -> Error {
    warn!(error = %err, "write-back failed");
    Error::WriteBack {
        message: err.to_string(),
        excerpt: excerpt(content),
    }
}

/// Short diagnostic excerpt, truncated on a char boundary.
fn excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_CHARS).collect()
}
