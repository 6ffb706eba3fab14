//! Error types for the rowsync CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=transport, 3=not_found, 4=validation, etc.)
//! - Retryability flags for scripted consumers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rowsync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Transport (exit 2)
    DatabaseError,

    // Not Found (exit 3)
    ProfileNotFound,
    LocalFileMissing,
    NoActiveSession,

    // Validation / session state (exit 4)
    InvalidTableName,
    SessionActive,
    ProfileExists,

    // Sync (exit 6)
    UnreadableCandidate,
    WriteBackFailed,

    // Config (exit 7)
    NotInitialized,
    AlreadyInitialized,
    MissingCredential,
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::LocalFileMissing => "LOCAL_FILE_MISSING",
            Self::NoActiveSession => "NO_ACTIVE_SESSION",
            Self::InvalidTableName => "INVALID_TABLE_NAME",
            Self::SessionActive => "SESSION_ACTIVE",
            Self::ProfileExists => "PROFILE_EXISTS",
            Self::UnreadableCandidate => "UNREADABLE_CANDIDATE",
            Self::WriteBackFailed => "WRITE_BACK_FAILED",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseError => 2,
            Self::ProfileNotFound | Self::LocalFileMissing | Self::NoActiveSession => 3,
            Self::InvalidTableName | Self::SessionActive | Self::ProfileExists => 4,
            Self::UnreadableCandidate | Self::WriteBackFailed => 6,
            Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::MissingCredential
            | Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the caller should retry after correcting state.
    ///
    /// True for an unreadable candidate (the session stays active so the
    /// user can restore the scratch copy and confirm again), for a stuck
    /// session slot, and for transient database failures.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UnreadableCandidate | Self::SessionActive | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in rowsync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `rowsync init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("No connection credential configured")]
    MissingCredential,

    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    #[error("Profile not found: {name} (did you mean: {}?)", similar.join(", "))]
    ProfileNotFoundSimilar { name: String, similar: Vec<String> },

    #[error("Profile already exists: {name}")]
    ProfileExists { name: String },

    #[error("Invalid table name: {name:?}")]
    InvalidTableName { name: String },

    #[error("Local file missing: {path} (uploading requires a source file)")]
    LocalFileMissing { path: PathBuf },

    #[error("No sync session is active")]
    NoActiveSession,

    #[error("A sync session is already active: {id}")]
    SessionActive { id: String },

    #[error("Candidate content is missing or empty: {path}")]
    UnreadableCandidate { path: PathBuf },

    #[error("Write-back failed: {message} (candidate begins: {excerpt:?})")]
    WriteBack { message: String, excerpt: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::MissingCredential => ErrorCode::MissingCredential,
            Self::ProfileNotFound { .. } | Self::ProfileNotFoundSimilar { .. } => {
                ErrorCode::ProfileNotFound
            }
            Self::ProfileExists { .. } => ErrorCode::ProfileExists,
            Self::InvalidTableName { .. } => ErrorCode::InvalidTableName,
            Self::LocalFileMissing { .. } => ErrorCode::LocalFileMissing,
            Self::NoActiveSession => ErrorCode::NoActiveSession,
            Self::SessionActive { .. } => ErrorCode::SessionActive,
            Self::UnreadableCandidate { .. } => ErrorCode::UnreadableCandidate,
            Self::WriteBack { .. } => ErrorCode::WriteBackFailed,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for scripts and humans.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => {
                Some("Run `rowsync init` to create a .rowsync/ workspace".to_string())
            }

            Self::AlreadyInitialized { path } => Some(format!(
                "Workspace already exists at {}. Use `--force` to recreate it.",
                path.display()
            )),

            Self::MissingCredential => Some(
                "Set a connection string with `rowsync credential set <dsn>`,\n  \
                 or export ROWSYNC_DSN, or pass --dsn."
                    .to_string(),
            ),

            Self::ProfileNotFound { name } => Some(format!(
                "No profile named '{name}'. Use `rowsync profile list` to see available profiles."
            )),
            Self::ProfileNotFoundSimilar { similar, .. } => {
                Some(format!("Did you mean: {}?", similar.join(", ")))
            }

            Self::ProfileExists { name } => Some(format!(
                "Remove it first with `rowsync profile remove {name}`."
            )),

            Self::InvalidTableName { .. } => Some(
                "Table names must start with a letter or underscore and contain only \
                 letters, digits, and underscores (one optional schema qualifier dot)."
                    .to_string(),
            ),

            Self::NoActiveSession => Some(
                "Start one first:\n  \
                 Download: rowsync download <profile>\n  \
                 Upload:   rowsync upload <profile>"
                    .to_string(),
            ),

            Self::SessionActive { id } => Some(format!(
                "Session {id} is still open. Finish it with `rowsync confirm` \
                 or discard it with `rowsync cancel`."
            )),

            Self::UnreadableCandidate { path } => Some(format!(
                "The candidate scratch copy at {} is gone or empty.\n  \
                 Restore its content and retry, or run `rowsync cancel` to discard the session.",
                path.display()
            )),

            Self::LocalFileMissing { .. }
            | Self::WriteBack { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
