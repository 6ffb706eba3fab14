//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// rowsync - sync a local file with a remote table row through a diff gate
#[derive(Parser, Debug)]
#[command(name = "rowsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Connection string for the record database
    /// (default: ROWSYNC_DSN, then ~/.rowsync/credential)
    #[arg(long, global = true, env = "ROWSYNC_DSN")]
    pub dsn: Option<String>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a rowsync workspace in the current directory
    Init {
        /// Recreate the workspace skeleton even if it exists
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Manage sync profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Start a download session (remote record → local file)
    Download {
        /// Profile name
        profile: String,
    },

    /// Start an upload session (local file → remote record)
    Upload {
        /// Profile name
        profile: String,
    },

    /// Write the candidate content to its destination and end the session
    Confirm,

    /// Discard the active session without writing
    Cancel,

    /// Show the active session and per-profile drift
    Status,

    /// Manage the connection credential
    Credential {
        #[command(subcommand)]
        command: CredentialCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Profile Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add a profile
    Add {
        /// Profile name (unique key)
        name: String,

        /// Local file path (relative to the workspace root, or absolute)
        #[arg(long)]
        file: PathBuf,

        /// Remote record id
        #[arg(long)]
        id: String,

        /// Remote table name (optionally schema-qualified)
        #[arg(long)]
        table: String,
    },

    /// List profiles
    List,

    /// Show one profile
    Show {
        /// Profile name
        name: String,
    },

    /// Remove a profile
    Remove {
        /// Profile name
        name: String,
    },
}

// ============================================================================
// Credential Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum CredentialCommands {
    /// Store the connection string in ~/.rowsync/credential (mode 0600)
    Set {
        /// Connection string for the record database
        dsn: String,
    },

    /// Print the credential file location
    Path,

    /// Remove the stored credential
    Clear,
}
