//! tourwatch library interface
//!
//! Polls a concert listing for one band, keeps events outside denied
//! countries, and flags events not seen in the previous pass.

pub mod error;
pub mod models;
pub mod output;
pub mod services;

pub use crate::error::{SyncError, SyncResult};

use std::path::PathBuf;
use tourwatch_common::config::{RootFolderInitializer, TourSettings};

use crate::services::{BandsintownClient, EventFilter, EventLogStore, Synchronizer};

/// Build a synchronizer wired to the events API and the log in `data_folder`
///
/// Creates the data folder when missing.
pub fn build_synchronizer(
    settings: &TourSettings,
    data_folder: PathBuf,
) -> anyhow::Result<Synchronizer> {
    let initializer = RootFolderInitializer::new(data_folder);
    initializer
        .ensure_directory_exists()
        .map_err(|e| anyhow::anyhow!("Failed to initialize data folder: {}", e))?;

    let log_path = initializer.event_log_path(&settings.log_file_name);
    tracing::info!("Event log: {}", log_path.display());

    let source = BandsintownClient::new(settings)?;
    tracing::info!(
        artist = %settings.artist,
        url = %source.events_url(),
        "Events source configured"
    );

    Ok(Synchronizer::new(
        Box::new(source),
        EventFilter::from_settings(settings),
        EventLogStore::new(log_path),
        settings.request_timeout,
    ))
}
