//! Status command implementation.
//!
//! Read-only: shows the active session (if any) and per-profile drift.
//! Stale sessions are reported, not cleaned up; the observer that
//! discards them runs on the sync commands themselves.

use colored::Colorize;
use serde::Serialize;

use crate::config::{self, resolve_dsn, ProfileDocument};
use crate::error::{Error, Result};
use crate::model::Profile;
use crate::storage::{RecordStore, SqliteRecordStore};
use crate::sync::{content_hash, has_changed, load_slot, SyncSession};

#[derive(Serialize)]
struct ProfileStatus {
    name: String,
    local_exists: bool,
    remote_exists: Option<bool>,
    in_sync: Option<bool>,
}

#[derive(Serialize)]
struct StatusOutput {
    workspace: String,
    session: Option<SessionStatus>,
    remote_checked: bool,
    profiles: Vec<ProfileStatus>,
}

#[derive(Serialize)]
struct SessionStatus {
    id: String,
    direction: String,
    profile: String,
    candidate: String,
    stale: bool,
}

/// Execute the status command.
pub fn execute(dsn: Option<&str>, json: bool) -> Result<()> {
    let workspace_dir = config::require_workspace_dir()?;
    let workspace_root = config::workspace_root(&workspace_dir);
    let profiles = ProfileDocument::load(&config::profiles_path(&workspace_dir))?;
    let session = load_slot(&config::session_path(&workspace_dir))?;

    // Drift needs the remote; without a credential, report local-only.
    let mut store = match resolve_dsn(dsn) {
        Ok(dsn) => Some(SqliteRecordStore::open(&dsn)?),
        Err(Error::MissingCredential) => None,
        Err(e) => return Err(e),
    };

    let mut rows = Vec::new();
    for profile in &profiles.profiles {
        rows.push(profile_status(profile, &workspace_root, store.as_mut())?);
    }

    let output = StatusOutput {
        workspace: workspace_dir.display().to_string(),
        session: session.as_ref().map(session_status),
        remote_checked: store.is_some(),
        profiles: rows,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    print_status(&output);
    Ok(())
}

fn profile_status(
    profile: &Profile,
    workspace_root: &std::path::Path,
    store: Option<&mut SqliteRecordStore>,
) -> Result<ProfileStatus> {
    let local_path = profile.resolved_file_path(workspace_root);
    let local = std::fs::read_to_string(&local_path).ok();
    let local_hash = local.as_deref().map(content_hash);

    let (remote_exists, in_sync) = match store {
        Some(store) => {
            let remote = store.fetch(&profile.table_name, &profile.id)?;
            let remote_hash = remote.as_ref().map(|r| content_hash(&r.data));
            (
                Some(remote.is_some()),
                Some(!has_changed(local_hash.as_deref(), remote_hash.as_deref())),
            )
        }
        None => (None, None),
    };

    Ok(ProfileStatus {
        name: profile.name.clone(),
        local_exists: local.is_some(),
        remote_exists,
        in_sync,
    })
}

fn session_status(session: &SyncSession) -> SessionStatus {
    SessionStatus {
        id: session.id.clone(),
        direction: session.direction.to_string(),
        profile: session.profile.name.clone(),
        candidate: session.candidate_path.display().to_string(),
        // Mirrors the terminal view's visibility rule.
        stale: !session.candidate_path.exists(),
    }
}

fn print_status(output: &StatusOutput) {
    println!("Workspace: {}", output.workspace);
    println!();

    match &output.session {
        Some(session) => {
            let state = if session.stale {
                "stale (candidate view closed; next sync command discards it)".yellow()
            } else {
                "active".green()
            };
            println!("Session: {} [{}]", session.id, state);
            println!("  direction: {}", session.direction);
            println!("  candidate: {}", session.candidate);
            println!("  finish with `rowsync confirm` or `rowsync cancel`");
        }
        None => println!("Session: {}", "none".dimmed()),
    }
    println!();

    if output.profiles.is_empty() {
        println!("No profiles. Add one with `rowsync profile add`.");
        return;
    }

    if !output.remote_checked {
        println!(
            "{} no credential configured; showing local state only.",
            "note:".yellow()
        );
    }

    for profile in &output.profiles {
        let marker = match (profile.in_sync, profile.local_exists) {
            (Some(true), _) => "in sync".green(),
            (Some(false), _) => "differs".red(),
            (None, true) => "local only".dimmed(),
            (None, false) => "missing".dimmed(),
        };
        let remote = match profile.remote_exists {
            Some(true) => "remote ✓",
            Some(false) => "remote ✗",
            None => "remote ?",
        };
        let local = if profile.local_exists {
            "local ✓"
        } else {
            "local ✗"
        };
        println!("  {:<20} {local}  {remote}  [{marker}]", profile.name);
    }
}
