//! Sync command implementations (download/upload/confirm/cancel).
//!
//! Each invocation is one discrete event against the workspace's single
//! session slot: restore the persisted session, run the close-detection
//! observer, perform the operation, persist the slot back. The slot is
//! persisted even when the operation itself fails, so cleanup performed
//! on the error path is never lost.

use std::path::PathBuf;

use colored::Colorize;

use crate::config::{self, resolve_dsn, ProfileDocument};
use crate::error::Result;
use crate::storage::SqliteRecordStore;
use crate::sync::{
    clear_slot, load_slot, store_slot, Orchestrator, StartOutcome, SyncDirection, SyncReport,
    TerminalDiffView,
};

struct SyncContext {
    slot_path: PathBuf,
    profiles: ProfileDocument,
    orchestrator: Orchestrator<SqliteRecordStore, TerminalDiffView>,
}

fn open_context(records: SqliteRecordStore, quiet: bool) -> Result<SyncContext> {
    let workspace_dir = config::require_workspace_dir()?;
    let workspace_root = config::workspace_root(&workspace_dir);
    let profiles = ProfileDocument::load(&config::profiles_path(&workspace_dir))?;
    let slot_path = config::session_path(&workspace_dir);

    let mut orchestrator = Orchestrator::new(
        records,
        TerminalDiffView::new(quiet),
        workspace_root,
        config::scratch_dir(&workspace_dir),
    );
    if let Some(session) = load_slot(&slot_path)? {
        orchestrator.restore(session);
    }

    Ok(SyncContext {
        slot_path,
        profiles,
        orchestrator,
    })
}

impl SyncContext {
    /// Run the close-detection observer and keep the slot in step.
    fn reconcile(&mut self, quiet: bool) -> Result<()> {
        if self.orchestrator.reconcile() {
            self.persist()?;
            if !quiet {
                println!("Discarded a session whose comparison view was closed externally.");
            }
        }
        Ok(())
    }

    /// Mirror the in-memory slot to disk.
    fn persist(&self) -> Result<()> {
        match self.orchestrator.session() {
            Some(session) => store_slot(&self.slot_path, session),
            None => clear_slot(&self.slot_path),
        }
    }
}

/// Start a download session.
pub fn download(profile: &str, dsn: Option<&str>, quiet: bool, json: bool) -> Result<()> {
    start(SyncDirection::Download, profile, dsn, quiet, json)
}

/// Start an upload session.
pub fn upload(profile: &str, dsn: Option<&str>, quiet: bool, json: bool) -> Result<()> {
    start(SyncDirection::Upload, profile, dsn, quiet, json)
}

fn start(
    direction: SyncDirection,
    profile: &str,
    dsn: Option<&str>,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let records = SqliteRecordStore::open(&resolve_dsn(dsn)?)?;
    let mut ctx = open_context(records, quiet || json)?;
    ctx.reconcile(quiet || json)?;

    let outcome = match direction {
        SyncDirection::Download => ctx.orchestrator.start_download(&ctx.profiles, profile),
        SyncDirection::Upload => ctx.orchestrator.start_upload(&ctx.profiles, profile),
    }?;
    ctx.persist()?;

    match outcome {
        StartOutcome::Started(session) => {
            if json {
                let output = serde_json::json!({
                    "outcome": "started",
                    "session": session.id,
                    "direction": direction.as_str(),
                    "reference": session.reference_path.display().to_string(),
                    "candidate": session.candidate_path.display().to_string(),
                });
                println!("{output}");
            }
            // The comparison view already printed everything otherwise.
        }
        StartOutcome::UpToDate => {
            if json {
                println!("{}", serde_json::json!({ "outcome": "up_to_date" }));
            } else if !quiet {
                println!("Nothing to sync: '{profile}' is identical on both sides.");
            }
        }
        StartOutcome::RemoteMissing => {
            if json {
                println!("{}", serde_json::json!({ "outcome": "remote_missing" }));
            } else if !quiet {
                println!(
                    "{} remote record for '{profile}' does not exist; nothing to download.",
                    "warning:".yellow().bold()
                );
            }
        }
    }
    Ok(())
}

/// Confirm the active session.
pub fn confirm(dsn: Option<&str>, quiet: bool, json: bool) -> Result<()> {
    let records = SqliteRecordStore::open(&resolve_dsn(dsn)?)?;
    let mut ctx = open_context(records, true)?;
    ctx.reconcile(quiet || json)?;

    let result = ctx.orchestrator.confirm();
    // Persist before propagating: a write-back failure still cleaned up.
    ctx.persist()?;
    let report = result?;

    print_report(&report, quiet, json)?;
    Ok(())
}

fn print_report(report: &SyncReport, quiet: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    match report.direction {
        SyncDirection::Download => println!(
            "{} wrote {} bytes to {}",
            "synced:".green().bold(),
            report.bytes,
            report.local_path.display()
        ),
        SyncDirection::Upload => println!(
            "{} wrote {} bytes to {}/{} and mirrored {}",
            "synced:".green().bold(),
            report.bytes,
            report.table,
            report.record_id,
            report.local_path.display()
        ),
    }
    Ok(())
}

/// Cancel the active session, if any.
pub fn cancel(quiet: bool, json: bool) -> Result<()> {
    // Cancel never touches the remote; use an in-memory stand-in store.
    let records = SqliteRecordStore::open_memory()?;
    let mut ctx = open_context(records, true)?;
    ctx.reconcile(true)?;

    let cancelled = ctx.orchestrator.cancel();
    ctx.persist()?;

    if json {
        println!("{}", serde_json::json!({ "cancelled": cancelled }));
    } else if !quiet {
        if cancelled {
            println!("Session discarded; nothing was written.");
        } else {
            println!("No sync session is active.");
        }
    }
    Ok(())
}
