//! Service modules for the synchronization pass
//!
//! - Remote event source (events API client)
//! - Country filter and date normalisation
//! - Novelty classification
//! - Persisted event log
//! - Pass orchestration

pub mod event_filter;
pub mod event_log;
pub mod event_source;
pub mod novelty;
pub mod synchronizer;

pub use event_filter::{EventFilter, FilterOutcome};
pub use event_log::{EventLogStore, LogEntry};
pub use event_source::{BandsintownClient, EventSource};
pub use synchronizer::Synchronizer;
