//! Version command implementation.

use crate::error::Result;

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let sqlite = rusqlite::version();

    if json {
        let output = serde_json::json!({
            "version": version,
            "sqlite": sqlite,
        });
        println!("{output}");
        return Ok(());
    }

    println!("rowsync version {version} (sqlite {sqlite})");
    Ok(())
}
