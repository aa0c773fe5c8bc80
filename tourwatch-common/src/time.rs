//! Timestamp and event date utilities

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Format of the `datetime` field in concert listings (local venue time, no zone)
pub const EVENT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Short display form: two-digit day and abbreviated month, e.g. "06 Jun"
pub const DISPLAY_DATE_FORMAT: &str = "%d %b";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a listing datetime such as `2024-06-06T20:00:00`
pub fn parse_event_datetime(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, EVENT_DATETIME_FORMAT).map_err(|e| {
        Error::InvalidDateTime {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Render a parsed datetime in the short display form
pub fn display_date(datetime: &NaiveDateTime) -> String {
    datetime.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parse a listing datetime and render it as a display date in one step
pub fn format_display_date(value: &str) -> Result<String> {
    parse_event_datetime(value).map(|dt| display_date(&dt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_format_display_date_pads_day() {
        assert_eq!(format_display_date("2024-06-06T20:00:00").unwrap(), "06 Jun");
    }

    #[test]
    fn test_format_display_date_two_digit_day() {
        assert_eq!(format_display_date("2017-11-23T19:30:00").unwrap(), "23 Nov");
    }

    #[test]
    fn test_format_display_date_ignores_time_of_day() {
        let evening = format_display_date("2024-01-31T23:59:59").unwrap();
        let morning = format_display_date("2024-01-31T00:00:00").unwrap();
        assert_eq!(evening, morning);
        assert_eq!(evening, "31 Jan");
    }

    #[test]
    fn test_parse_rejects_date_only() {
        let err = parse_event_datetime("2024-06-06").unwrap_err();
        assert!(matches!(err, Error::InvalidDateTime { .. }));
    }

    #[test]
    fn test_parse_rejects_timezone_suffix() {
        assert!(parse_event_datetime("2024-06-06T20:00:00Z").is_err());
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        let err = parse_event_datetime("2024-02-30T20:00:00").unwrap_err();
        match err {
            Error::InvalidDateTime { value, .. } => assert_eq!(value, "2024-02-30T20:00:00"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
