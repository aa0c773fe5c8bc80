//! Novelty classification against the persisted log
//!
//! Rules, per candidate:
//! - More candidates than logged entries: new unless some logged entry has
//!   the same display date.
//! - Otherwise: new only on an automatic refresh, and only when a logged
//!   entry with the same display date was itself new. A manual refresh
//!   therefore clears every flag once the listing stops growing.
//!
//! Events have no stable identifier, so two shows on the same display date
//! are indistinguishable here.

use crate::models::{Event, RefreshMode};
use crate::services::event_log::LogEntry;
use tracing::debug;

/// Flag new candidates in place; returns the number flagged
pub fn classify(candidates: &mut [Event], saved: &[LogEntry], mode: RefreshMode) -> usize {
    let listing_grew = candidates.len() > saved.len();
    let mut new_events = 0;

    for event in candidates.iter_mut() {
        event.is_new = if listing_grew {
            !saved.iter().any(|entry| entry.date == event.date)
        } else {
            !mode.resets_new_events()
                && saved
                    .iter()
                    .any(|entry| entry.date == event.date && entry.was_new)
        };

        if event.is_new {
            new_events += 1;
        }
    }

    debug!(
        candidates = candidates.len(),
        saved = saved.len(),
        listing_grew,
        %mode,
        new_events,
        "Classified events"
    );

    new_events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(dates: &[&str]) -> Vec<Event> {
        dates
            .iter()
            .enumerate()
            .map(|(i, date)| Event::new("France", format!("City {i}"), *date))
            .collect()
    }

    fn saved(entries: &[(&str, bool)]) -> Vec<LogEntry> {
        entries
            .iter()
            .map(|(date, was_new)| LogEntry {
                country: "France".to_string(),
                city: "Somewhere".to_string(),
                date: date.to_string(),
                was_new: *was_new,
            })
            .collect()
    }

    fn flags(events: &[Event]) -> Vec<bool> {
        events.iter().map(|e| e.is_new).collect()
    }

    #[test]
    fn test_empty_log_flags_everything() {
        for mode in [RefreshMode::Manual, RefreshMode::Automatic] {
            let mut events = candidates(&["06 Jun", "07 Jun", "09 Jun"]);
            let count = classify(&mut events, &[], mode);
            assert_eq!(count, 3);
            assert_eq!(flags(&events), vec![true, true, true]);
        }
    }

    #[test]
    fn test_growth_flags_only_unseen_dates() {
        let mut events = candidates(&["06 Jun", "07 Jun", "09 Jun"]);
        let log = saved(&[("06 Jun", false), ("09 Jun", true)]);

        let count = classify(&mut events, &log, RefreshMode::Manual);

        assert_eq!(count, 1);
        assert_eq!(flags(&events), vec![false, true, false]);
    }

    #[test]
    fn test_growth_ignores_previous_flag() {
        let mut events = candidates(&["06 Jun", "07 Jun"]);
        let log = saved(&[("06 Jun", true)]);

        classify(&mut events, &log, RefreshMode::Automatic);

        // Still listed in the log, so not new even though it was new before
        assert_eq!(flags(&events), vec![false, true]);
    }

    #[test]
    fn test_manual_refresh_with_same_dates_clears_flags() {
        let mut events = candidates(&["06 Jun", "07 Jun"]);
        let log = saved(&[("06 Jun", true), ("07 Jun", true)]);

        let count = classify(&mut events, &log, RefreshMode::Manual);

        assert_eq!(count, 0);
        assert_eq!(flags(&events), vec![false, false]);
    }

    #[test]
    fn test_automatic_refresh_keeps_previously_new() {
        let mut events = candidates(&["06 Jun", "07 Jun"]);
        let log = saved(&[("06 Jun", true), ("07 Jun", false)]);

        let count = classify(&mut events, &log, RefreshMode::Automatic);

        assert_eq!(count, 1);
        assert_eq!(flags(&events), vec![true, false]);
    }

    #[test]
    fn test_shrinking_listing_unknown_date_is_not_new() {
        let mut events = candidates(&["20 Dec"]);
        let log = saved(&[("06 Jun", true), ("07 Jun", true)]);

        let count = classify(&mut events, &log, RefreshMode::Automatic);

        assert_eq!(count, 0);
        assert!(!events[0].is_new);
    }

    #[test]
    fn test_same_display_date_aliases() {
        // Two shows on the same day share one log match
        let mut events = candidates(&["06 Jun", "06 Jun", "08 Jun"]);
        let log = saved(&[("06 Jun", false), ("07 Jun", false)]);

        let count = classify(&mut events, &log, RefreshMode::Manual);

        assert_eq!(count, 1);
        assert_eq!(flags(&events), vec![false, false, true]);
    }

    #[test]
    fn test_flags_reset_before_classification() {
        let mut events = candidates(&["06 Jun"]);
        events[0].is_new = true;
        let log = saved(&[("06 Jun", false)]);

        classify(&mut events, &log, RefreshMode::Automatic);

        assert!(!events[0].is_new);
    }
}
