//! Init command implementation.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::{self, ProfileDocument, WORKSPACE_DIR};
use crate::error::{Error, Result};

/// .gitignore for the `.rowsync/` directory.
///
/// Whitelist pattern: ignore everything by default, then explicitly
/// include only the profile document. Session state, scratch copies,
/// and temp files never reach git this way.
#[must_use]
pub fn gitignore_content() -> &'static str {
    r"# rowsync workspace directory
# Whitelist pattern: ignore everything except the profile document

# Ignore everything by default
*

# Allow .gitignore itself
!.gitignore

# Allow the profile document (safe to commit; holds no credential)
!profiles.json
"
}

/// Ensure .gitignore exists in the workspace directory.
///
/// If the file already exists, it is not modified (user may have
/// customized it).
fn ensure_gitignore(workspace_dir: &Path) -> Result<()> {
    let gitignore_path = workspace_dir.join(".gitignore");

    if gitignore_path.exists() {
        return Ok(());
    }

    let mut file = fs::File::create(&gitignore_path)?;
    file.write_all(gitignore_content().as_bytes())?;
    file.sync_all()?;

    Ok(())
}

/// Create a `.rowsync/` workspace in the current directory.
///
/// # Errors
///
/// Returns `AlreadyInitialized` when the workspace exists and `--force`
/// was not given.
pub fn execute(force: bool, json: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let workspace_dir = cwd.join(WORKSPACE_DIR);
    let profiles_path = config::profiles_path(&workspace_dir);

    if workspace_dir.exists() && profiles_path.exists() && !force {
        return Err(Error::AlreadyInitialized {
            path: workspace_dir,
        });
    }

    fs::create_dir_all(&workspace_dir)?;
    fs::create_dir_all(config::scratch_dir(&workspace_dir))?;
    ProfileDocument::default().save(&profiles_path)?;
    ensure_gitignore(&workspace_dir)?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "workspace": workspace_dir.display().to_string(),
        });
        println!("{output}");
    } else {
        println!("Initialized rowsync workspace at {}", workspace_dir.display());
        println!();
        println!("Next steps:");
        println!("  rowsync credential set <dsn>");
        println!("  rowsync profile add <name> --file <path> --id <record-id> --table <table>");
    }

    Ok(())
}
