//! Library error type and the non-short-circuiting error stack.
//!
//! Every fallible operation in the store, gateways and facades returns
//! [`Result`]. The command layer wraps these in `anyhow` for reporting.

use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidError {
    // ---------------------------
    // Storage
    // ---------------------------
    #[error("state: No bucket found: {0}")]
    NilBucket(String),

    #[error("state: No value found")]
    NilResult,

    #[error("state: `value` must not be empty")]
    NilValue,

    #[error("state: Failed to encode or decode record: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("state: Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Migrations
    // ---------------------------
    #[error("migrate: Migration {0} is registered more than once")]
    DuplicateMigration(u64),

    #[error("migrate: Migration {version} failed: {reason}")]
    Migration { version: u64, reason: String },

    // ---------------------------
    // Tracking
    // ---------------------------
    #[error("tracking: Stop your existing timer before starting a new one")]
    TimerAlreadyRunning,

    #[error("tracking: There is no active timer running")]
    NoTimerRunning,

    #[error("tracking: No timer to resume")]
    NoTimerToResume,

    #[error("tracking: The start date must be before the end date")]
    InvalidDateRange,

    #[error("tracking: Duration cannot be less than 0")]
    NegativeDuration,

    #[error("tracking: Duration is out of range")]
    DurationOutOfRange,

    #[error("tracking: Short hash '{0}' matches {1} entries, use the full hash")]
    AmbiguousShortHash(String, usize),

    // ---------------------------
    // Workspaces
    // ---------------------------
    #[error("workspace: Workspace '{0}' already exists")]
    WorkspaceAlreadyExists(String),

    #[error("workspace: Workspace '{0}' does not exist")]
    WorkspaceNotFound(String),

    #[error("workspace: Workspace '{0}' is active, switch to another workspace first")]
    WorkspaceActive(String),

    #[error("workspace: Workspace '{0}' cannot be deleted")]
    WorkspaceProtected(String),

    #[error("workspace: Workspace names must be non-empty and use only letters, digits, '-' and '_'")]
    InvalidWorkspaceName,

    #[error("{0}")]
    Multiple(ErrorStack),
}

pub type Result<T> = std::result::Result<T, TidError>;

/// Collects errors from a sequence of independent writes.
///
/// Every write is attempted; the combined error is only produced when at
/// least one of them failed.
#[derive(Debug, Default)]
pub struct ErrorStack {
    errors: Vec<TidError>,
}

impl ErrorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T>(&mut self, result: Result<T>) {
        if let Err(err) = result {
            self.errors.push(err);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[TidError] {
        &self.errors
    }

    /// Returns `Ok(())` when nothing failed. A single error is returned as-is
    /// so callers can still match on it.
    pub fn into_result(mut self) -> Result<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(TidError::Multiple(self)),
        }
    }
}

impl fmt::Display for ErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errhandling: The following errors occurred:")?;
        for err in &self.errors {
            write!(f, "\n{}", err)?;
        }
        Ok(())
    }
}
