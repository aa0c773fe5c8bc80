//! Synchronization pass state machine and result
//!
//! A pass progresses through:
//! IDLE → FETCHING → FILTERING → CLASSIFYING → PERSISTING → COMPLETED
//!
//! Any stage may end in FAILED. A failed pass surfaces nothing but its error.

use crate::models::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a synchronization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PassState {
    /// No work started yet
    Idle,
    /// Waiting on the events API
    Fetching,
    /// Country filtering and date formatting
    Filtering,
    /// Comparing against the persisted log
    Classifying,
    /// Rewriting the persisted log
    Persisting,
    /// Pass finished; report handed to the caller
    Completed,
    /// Pass aborted; nothing committed
    Failed,
}

impl PassState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PassState::Completed | PassState::Failed)
    }
}

impl fmt::Display for PassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassState::Idle => "IDLE",
            PassState::Fetching => "FETCHING",
            PassState::Filtering => "FILTERING",
            PassState::Classifying => "CLASSIFYING",
            PassState::Persisting => "PERSISTING",
            PassState::Completed => "COMPLETED",
            PassState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// What triggered a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// User asked for a refresh; stale "new" flags are cleared
    Manual,
    /// Startup or timer refresh; previously new events stay new
    Automatic,
}

impl RefreshMode {
    /// Map the "reset new events" flag used by front ends
    pub fn from_reset_flag(reset_new_events: bool) -> Self {
        if reset_new_events {
            RefreshMode::Manual
        } else {
            RefreshMode::Automatic
        }
    }

    pub fn resets_new_events(self) -> bool {
        self == RefreshMode::Manual
    }
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshMode::Manual => f.write_str("manual"),
            RefreshMode::Automatic => f.write_str("automatic"),
        }
    }
}

/// Outcome of a successful pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Displayed events in listing order
    pub events: Vec<Event>,
    /// Number of displayed events
    pub total_events: usize,
    /// Events in the highlighted country (counted, not displayed)
    pub highlighted_events: usize,
    /// Displayed events flagged new
    pub new_events: usize,
    pub mode: RefreshMode,
    pub completed_at: DateTime<Utc>,
}

impl SyncReport {
    /// Text shown next to the status icon: the new-event count, or nothing
    pub fn status_title(&self) -> String {
        if self.new_events > 0 {
            self.new_events.to_string()
        } else {
            String::new()
        }
    }
}
