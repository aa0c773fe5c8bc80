//! # tourwatch common library
//!
//! Shared code for the tourwatch crates:
//! - Error and result types
//! - Configuration loading and data folder resolution
//! - Tracing subscriber setup
//! - Date/time helpers for event display dates

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
