//! Data models for tourwatch
//!
//! - Events as displayed after filtering and classification
//! - Synchronization pass state and its final report

pub mod event;
pub mod sync_pass;

pub use event::Event;
pub use sync_pass::{PassState, RefreshMode, SyncReport};
