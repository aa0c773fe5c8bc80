//! Concert event as shown to the user

use serde::{Deserialize, Serialize};
use std::fmt;

/// One concert, rebuilt from the remote listing on every pass
///
/// Events carry no identifier. Novelty matching uses `date` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub country: String,
    pub city: String,
    /// Short display date, e.g. "06 Jun"
    pub date: String,
    pub is_new: bool,
}

impl Event {
    pub fn new(
        country: impl Into<String>,
        city: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
            date: date.into(),
            is_new: false,
        }
    }

    /// True when the country name contains `needle`
    pub fn matches_country(&self, needle: &str) -> bool {
        self.country.contains(needle)
    }

    /// Location column of a listing row
    pub fn location_label(&self) -> String {
        format!("{},  {}", self.country, self.city)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.country, self.city, self.date)
    }
}
