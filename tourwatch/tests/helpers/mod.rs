//! Test Helper Utilities
//!
//! Shared utilities for testing tourwatch

pub mod events_api;

// Re-export commonly used items
pub use events_api::{listing, settings_for, FakeEventsApi, RecordedRequest};
