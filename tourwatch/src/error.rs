//! Error types for tourwatch
//!
//! Every variant is terminal for the pass that raised it. Nothing is retried;
//! recovery is the next scheduled or user-initiated pass.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for synchronization operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Synchronization pass errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// Events endpoint could not be turned into a request URL
    #[error("Invalid events endpoint '{0}'")]
    InvalidEndpoint(String),

    /// Connection, DNS or body transfer failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Any response other than 200
    #[error("Events API returned {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Events request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Synchronization cancelled")]
    Cancelled,

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON array of events")]
    NotAnArray,

    /// A listing lacks `venue`, `country`, `city` or `datetime`
    #[error("Event #{index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Event #{index} has an invalid datetime: {source}")]
    InvalidDate {
        index: usize,
        #[source]
        source: tourwatch_common::Error,
    },

    /// Persisted log line that does not have the expected shape (1-based line)
    #[error("Corrupt event log at line {line}: {reason}")]
    CorruptLog { line: usize, reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another pass holds the synchronizer
    #[error("A synchronization pass is already in flight")]
    PassInFlight,
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    /// Coarse category used in log fields
    pub fn category(&self) -> &'static str {
        match self {
            SyncError::InvalidEndpoint(_)
            | SyncError::Transport(_)
            | SyncError::HttpStatus { .. }
            | SyncError::Timeout(_)
            | SyncError::Cancelled => "transport",
            SyncError::InvalidJson(_)
            | SyncError::NotAnArray
            | SyncError::MissingField { .. }
            | SyncError::InvalidDate { .. } => "payload",
            SyncError::CorruptLog { .. } | SyncError::Io { .. } => "filesystem",
            SyncError::PassInFlight => "orchestration",
        }
    }
}
