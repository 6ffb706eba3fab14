//! Credential command implementations.

use crate::cli::CredentialCommands;
use crate::config::{clear_credential, credential_path, store_credential};
use crate::error::{Error, Result};

/// Execute credential commands.
pub fn execute(command: &CredentialCommands, json: bool) -> Result<()> {
    match command {
        CredentialCommands::Set { dsn } => set(dsn, json),
        CredentialCommands::Path => path(json),
        CredentialCommands::Clear => clear(json),
    }
}

fn set(dsn: &str, json: bool) -> Result<()> {
    if dsn.trim().is_empty() {
        return Err(Error::Config("credential must not be empty".to_string()));
    }

    let path = store_credential(dsn)?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "path": path.display().to_string(),
        });
        println!("{output}");
    } else {
        println!("Credential stored at {}", path.display());
        println!("It takes effect on the next command.");
    }
    Ok(())
}

fn path(json: bool) -> Result<()> {
    let path = credential_path()
        .ok_or_else(|| Error::Config("could not determine home directory".to_string()))?;

    if json {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{output}");
    } else {
        println!("{}", path.display());
        if !path.exists() {
            println!("(no credential stored)");
        }
    }
    Ok(())
}

fn clear(json: bool) -> Result<()> {
    let removed = clear_credential()?;

    if json {
        let output = serde_json::json!({ "success": true, "removed": removed });
        println!("{output}");
    } else if removed {
        println!("Credential removed.");
    } else {
        println!("No credential was stored.");
    }
    Ok(())
}
