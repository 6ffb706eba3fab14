//! Profile command implementations.

use std::path::PathBuf;

use crate::cli::ProfileCommands;
use crate::config::{self, ProfileDocument};
use crate::error::Result;
use crate::model::{Profile, TableName};

/// Execute profile commands.
pub fn execute(command: &ProfileCommands, json: bool) -> Result<()> {
    match command {
        ProfileCommands::Add {
            name,
            file,
            id,
            table,
        } => add(name, file, id, table, json),
        ProfileCommands::List => list(json),
        ProfileCommands::Show { name } => show(name, json),
        ProfileCommands::Remove { name } => remove(name, json),
    }
}

fn load() -> Result<(PathBuf, ProfileDocument)> {
    let workspace_dir = config::require_workspace_dir()?;
    let path = config::profiles_path(&workspace_dir);
    let doc = ProfileDocument::load(&path)?;
    Ok((path, doc))
}

fn add(name: &str, file: &PathBuf, id: &str, table: &str, json: bool) -> Result<()> {
    let (path, mut doc) = load()?;

    let profile = Profile {
        name: name.to_string(),
        file_path: file.clone(),
        id: id.to_string(),
        table_name: TableName::new(table)?,
    };
    doc.add(profile)?;
    doc.save(&path)?;

    if json {
        let output = serde_json::json!({ "success": true, "profile": name });
        println!("{output}");
    } else {
        println!("Added profile '{name}'");
    }
    Ok(())
}

fn list(json: bool) -> Result<()> {
    let (_, doc) = load()?;

    if json {
        println!("{}", serde_json::to_string(&doc)?);
        return Ok(());
    }

    if doc.profiles.is_empty() {
        println!("No profiles. Add one with `rowsync profile add`.");
        return Ok(());
    }

    for profile in &doc.profiles {
        println!(
            "  {}  {}  ←→  {}/{}",
            profile.name,
            profile.file_path.display(),
            profile.table_name,
            profile.id
        );
    }
    Ok(())
}

fn show(name: &str, json: bool) -> Result<()> {
    let (_, doc) = load()?;
    let profile = doc.find(name)?;

    if json {
        println!("{}", serde_json::to_string(profile)?);
        return Ok(());
    }

    println!("Profile: {}", profile.name);
    println!("  file:  {}", profile.file_path.display());
    println!("  table: {}", profile.table_name);
    println!("  id:    {}", profile.id);
    Ok(())
}

fn remove(name: &str, json: bool) -> Result<()> {
    let (path, mut doc) = load()?;
    let removed = doc.remove(name)?;
    doc.save(&path)?;

    if json {
        let output = serde_json::json!({ "success": true, "removed": removed.name });
        println!("{output}");
    } else {
        println!("Removed profile '{}'", removed.name);
    }
    Ok(())
}
