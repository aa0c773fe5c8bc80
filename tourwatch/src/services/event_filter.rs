//! Country filtering and normalisation of raw listings
//!
//! Each listing must look like
//! `{ "venue": { "country": .., "city": .. }, "datetime": "YYYY-MM-DDTHH:MM:SS" }`.
//! Order of checks per listing:
//! 1. Denied country: dropped, not counted
//! 2. Highlighted country: counted, dropped
//! 3. Anything else: kept as a display event, in source order
//!
//! One malformed listing fails the whole pass. Control characters in a
//! kept country or city become spaces.

use crate::error::{SyncError, SyncResult};
use crate::models::Event;
use serde_json::Value;
use tourwatch_common::config::TourSettings;
use tourwatch_common::time::format_display_date;
use tracing::{debug, error};

/// Result of filtering one listing payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Display events, none flagged new yet
    pub candidates: Vec<Event>,
    /// Listings in the highlighted country
    pub highlighted_count: usize,
    /// Listings dropped by the country denylist
    pub denied_count: usize,
}

/// Country rules applied to every pass
#[derive(Debug, Clone)]
pub struct EventFilter {
    denied_countries: Vec<String>,
    highlighted_country: String,
}

impl EventFilter {
    pub fn new(denied_countries: Vec<String>, highlighted_country: impl Into<String>) -> Self {
        Self {
            denied_countries,
            highlighted_country: highlighted_country.into(),
        }
    }

    pub fn from_settings(settings: &TourSettings) -> Self {
        Self::new(
            settings.denied_countries.clone(),
            settings.highlighted_country.clone(),
        )
    }

    fn is_denied(&self, country: &str) -> bool {
        self.denied_countries.iter().any(|c| c == country)
    }

    /// Filter a raw response body
    pub fn apply_body(&self, body: &str) -> SyncResult<FilterOutcome> {
        let listings = parse_payload(body)?;
        self.apply(&listings)
    }

    /// Filter parsed listings
    pub fn apply(&self, listings: &[Value]) -> SyncResult<FilterOutcome> {
        let mut outcome = FilterOutcome::default();

        for (index, listing) in listings.iter().enumerate() {
            let venue = listing
                .get("venue")
                .filter(|v| v.is_object())
                .ok_or_else(|| missing(index, "venue"))?;
            let country = string_field(venue, "country").ok_or_else(|| missing(index, "country"))?;

            if self.is_denied(country) {
                outcome.denied_count += 1;
                continue;
            }

            if country == self.highlighted_country {
                outcome.highlighted_count += 1;
                continue;
            }

            let city = string_field(venue, "city").ok_or_else(|| missing(index, "city"))?;
            let datetime =
                string_field(listing, "datetime").ok_or_else(|| missing(index, "datetime"))?;

            let date = format_display_date(datetime).map_err(|source| {
                error!(index, datetime = %datetime, "Datetime parsing error");
                SyncError::InvalidDate { index, source }
            })?;

            outcome
                .candidates
                .push(Event::new(single_line(country), single_line(city), date));
        }

        debug!(
            kept = outcome.candidates.len(),
            highlighted = outcome.highlighted_count,
            denied = outcome.denied_count,
            "Filtered event listings"
        );

        Ok(outcome)
    }
}

/// Parse a response body into its listing array
pub fn parse_payload(body: &str) -> SyncResult<Vec<Value>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SyncError::InvalidJson(e.to_string()))?;

    match value {
        Value::Array(listings) => Ok(listings),
        _ => Err(SyncError::NotAnArray),
    }
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Replace control characters with spaces so a value fits on one log line
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn missing(index: usize, field: &'static str) -> SyncError {
    error!(index, field, "Event listing is missing a required field");
    SyncError::MissingField { index, field }
}
