//! Persisted log of previously seen events
//!
//! Plain text, one event per line, no header:
//!
//! ```text
//! France, Paris, 06 Jun, true
//! Germany, Berlin, 12 Jul, false
//! ```
//!
//! The log is the novelty baseline for the next pass and is rewritten in
//! full after every successful one.

use crate::error::{SyncError, SyncResult};
use crate::models::Event;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Field delimiter within a log line
pub const FIELD_DELIMITER: &str = ", ";

/// One line of the persisted log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub country: String,
    pub city: String,
    pub date: String,
    /// Whether the event was flagged new when the line was written
    pub was_new: bool,
}

impl LogEntry {
    /// Render as a log line (without newline)
    pub fn to_line(&self) -> String {
        [
            self.country.as_str(),
            self.city.as_str(),
            self.date.as_str(),
            if self.was_new { "true" } else { "false" },
        ]
        .join(FIELD_DELIMITER)
    }

    /// Parse a log line; `line_number` is 1-based and only used in errors
    ///
    /// Fields are taken from the right: the last is the flag, the one before
    /// it is the date, and the rest splits into country and city at the first
    /// delimiter. A city containing the delimiter therefore survives a round
    /// trip.
    pub fn parse_line(line: &str, line_number: usize) -> SyncResult<Self> {
        let corrupt = |reason: &str| SyncError::CorruptLog {
            line: line_number,
            reason: reason.to_string(),
        };

        let mut from_right = line.rsplitn(3, FIELD_DELIMITER);
        let flag = from_right.next().ok_or_else(|| corrupt("empty line"))?;
        let date = from_right
            .next()
            .ok_or_else(|| corrupt("expected 4 fields, found 1"))?;
        let location = from_right
            .next()
            .ok_or_else(|| corrupt("expected 4 fields, found 2"))?;
        let (country, city) = location
            .split_once(FIELD_DELIMITER)
            .ok_or_else(|| corrupt("expected 4 fields, found 3"))?;

        let was_new = match flag {
            "true" => true,
            "false" => false,
            other => return Err(corrupt(&format!("flag must be true or false, got '{}'", other))),
        };

        if date.is_empty() {
            return Err(corrupt("empty date"));
        }

        Ok(Self {
            country: country.to_string(),
            city: city.to_string(),
            date: date.to_string(),
            was_new,
        })
    }
}

impl From<&Event> for LogEntry {
    fn from(event: &Event) -> Self {
        Self {
            country: event.country.clone(),
            city: event.city.clone(),
            date: event.date.clone(),
            was_new: event.is_new,
        }
    }
}

/// Parse full log contents; blank lines are skipped
pub fn parse_log(content: &str) -> SyncResult<Vec<LogEntry>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| LogEntry::parse_line(line, i + 1))
        .collect()
}

/// Render events as full log contents (no trailing newline)
pub fn render_log(events: &[Event]) -> String {
    events
        .iter()
        .map(|event| LogEntry::from(event).to_line())
        .collect::<Vec<_>>()
        .join("\n")
}

/// File-backed event log
#[derive(Debug, Clone)]
pub struct EventLogStore {
    path: PathBuf,
}

impl EventLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the log, creating an empty file when none exists
    pub fn load(&self) -> SyncResult<Vec<LogEntry>> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Event log not found, creating empty log");
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
            }
            fs::write(&self.path, "").map_err(|e| self.io_error(&self.path, e))?;
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(&self.path, e))?;
        let entries = parse_log(&content).inspect_err(|e| {
            error!(path = %self.path.display(), "Failed reading event log: {}", e);
        })?;

        debug!(path = %self.path.display(), entries = entries.len(), "Loaded event log");
        Ok(entries)
    }

    /// Overwrite the log with `events`
    ///
    /// Written to a sibling temp file first and renamed into place, so the
    /// previous log survives a failed write.
    pub fn save(&self, events: &[Event]) -> SyncResult<()> {
        let content = render_log(events);
        let tmp_path = self.temp_path();

        fs::write(&tmp_path, content.as_bytes()).map_err(|e| self.io_error(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(&self.path, e));
        }

        debug!(path = %self.path.display(), entries = events.len(), "Wrote event log");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> SyncError {
        error!(path = %path.display(), "Event log I/O error: {}", source);
        SyncError::io(path, source)
    }
}
