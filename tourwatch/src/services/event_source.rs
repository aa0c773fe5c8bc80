//! Remote event source
//!
//! One GET per pass against `{base_url}/{artist}/events?app_id={app_id}`.
//! Only a 200 response counts as success. There is no retry or backoff; the
//! next pass is the only recovery.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tourwatch_common::config::TourSettings;
use tracing::{debug, error, info, warn};

const USER_AGENT: &str = concat!("tourwatch/", env!("CARGO_PKG_VERSION"));

/// Source of the raw event listing
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch the raw response body (expected to be a JSON array)
    async fn fetch_events(&self) -> SyncResult<String>;
}

/// Bandsintown artist events client
pub struct BandsintownClient {
    http_client: reqwest::Client,
    events_url: Url,
    timeout: Duration,
}

impl BandsintownClient {
    pub fn new(settings: &TourSettings) -> SyncResult<Self> {
        let events_url = build_events_url(&settings.base_url, &settings.artist, &settings.app_id)?;

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            events_url,
            timeout: settings.request_timeout,
        })
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }
}

#[async_trait]
impl EventSource for BandsintownClient {
    async fn fetch_events(&self) -> SyncResult<String> {
        debug!(url = %self.events_url, "Querying events API");

        let response = self
            .http_client
            .get(self.events_url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(timeout = ?self.timeout, "Events API request timed out");
                    SyncError::Timeout(self.timeout)
                } else {
                    error!("Events API error: {}", e);
                    SyncError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            warn!(
                status = status.as_u16(),
                reason = %reason,
                "Events API returned non-200 response"
            );
            return Err(SyncError::HttpStatus {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read events response body: {}", e);
            SyncError::Transport(e.to_string())
        })?;

        info!(bytes = body.len(), "Retrieved events listing");
        Ok(body)
    }
}

/// Build the events URL with the artist percent-encoded as a path segment
///
/// Spaces become `%20` in both the path and the query.
pub fn build_events_url(base_url: &str, artist: &str, app_id: &str) -> SyncResult<Url> {
    let mut url =
        Url::parse(base_url).map_err(|e| SyncError::InvalidEndpoint(format!("{base_url}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| SyncError::InvalidEndpoint(base_url.to_string()))?
        .pop_if_empty()
        .push(artist)
        .push("events");

    url.set_query(Some(&format!("app_id={}", app_id)));
    Ok(url)
}
