//! The comparison-view seam.
//!
//! The host surface that actually shows a side-by-side comparison is an
//! external collaborator; the orchestrator only talks to the [`DiffView`]
//! trait. The default implementation renders a unified diff to the
//! terminal and treats the scratch files themselves as "the view": the
//! user edits the candidate copy in any editor, and deleting it counts
//! as closing the view.

use std::fs;
use std::path::Path;

use colored::Colorize;
use similar::TextDiff;

use crate::error::Result;

/// Everything a view needs to present one comparison.
#[derive(Debug)]
pub struct ViewRequest<'a> {
    pub title: &'a str,
    pub reference: &'a Path,
    pub candidate: &'a Path,
}

/// A comparison view over the two scratch copies of a session.
pub trait DiffView {
    /// Open a comparison of reference vs candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be presented; the caller
    /// treats this as a failed session start.
    fn open(&mut self, request: &ViewRequest<'_>) -> Result<()>;

    /// Persist any in-memory edits of the candidate so a subsequent
    /// read from storage sees them.
    ///
    /// # Errors
    ///
    /// Returns an error if pending edits cannot be persisted.
    fn flush(&mut self, candidate: &Path) -> Result<()>;

    /// Whether the candidate is still visible in any open view.
    fn is_open(&self, candidate: &Path) -> bool;

    /// Best-effort close. Only called while the view reports open.
    fn close(&mut self, candidate: &Path);
}

/// Terminal renderer: prints a unified diff and leaves the scratch
/// copies on disk for hand editing.
#[derive(Debug, Default)]
pub struct TerminalDiffView {
    /// Suppress diff output (`--quiet`); the scratch files still exist.
    pub quiet: bool,
}

impl TerminalDiffView {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl DiffView for TerminalDiffView {
    fn open(&mut self, request: &ViewRequest<'_>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let reference = fs::read_to_string(request.reference)?;
        let candidate = fs::read_to_string(request.candidate)?;

        println!("{}", request.title.bold());
        println!(
            "  reference: {}",
            request.reference.display().to_string().dimmed()
        );
        println!(
            "  candidate: {}",
            request.candidate.display().to_string().dimmed()
        );
        println!();

        let diff = TextDiff::from_lines(&reference, &candidate);
        let unified = diff
            .unified_diff()
            .context_radius(3)
            .header("reference", "candidate")
            .to_string();

        for line in unified.lines() {
            if line.starts_with("+++") || line.starts_with("---") {
                println!("{}", line.bold());
            } else if line.starts_with("@@") {
                println!("{}", line.cyan());
            } else if line.starts_with('+') {
                println!("{}", line.green());
            } else if line.starts_with('-') {
                println!("{}", line.red());
            } else {
                println!("{line}");
            }
        }
        println!();
        println!(
            "Edit the candidate copy if needed, then `rowsync confirm` or `rowsync cancel`."
        );

        Ok(())
    }

    fn flush(&mut self, _candidate: &Path) -> Result<()> {
        // Edits happen directly on the scratch file; nothing buffered.
        Ok(())
    }

    fn is_open(&self, candidate: &Path) -> bool {
        // The scratch copy on disk is the view. Deleting it is how a
        // terminal user "closes the tab" without confirming.
        candidate.exists()
    }

    fn close(&mut self, _candidate: &Path) {
        // Nothing is held open in a terminal.
    }
}
