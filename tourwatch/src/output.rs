//! Terminal rendering of pass results
//!
//! Mirrors the menu layout: a summary line first, then one row per event
//! with the location and date columns. New events are marked with `*`.

use crate::models::SyncReport;
use crate::services::LogEntry;
use std::fmt::Write;

const NEW_MARKER: &str = "*";

/// Render a completed pass for the terminal
pub fn render_report(report: &SyncReport, artist: &str, highlighted_country: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({} refresh at {})",
        artist,
        report.mode,
        report.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "{}", summary_line(report, highlighted_country));
    let title = report.status_title();
    if !title.is_empty() {
        let _ = writeln!(out, "Status: {}", title);
    }

    let rows: Vec<(String, &str, bool)> = report
        .events
        .iter()
        .map(|e| (e.location_label(), e.date.as_str(), e.is_new))
        .collect();
    render_rows(&mut out, &rows);

    out
}

/// Counter summary, e.g. `3 gigs (+ 2 in the UK) - 1 NEW`
///
/// The highlighted clause is omitted when nothing was highlighted and the
/// NEW clause when nothing is new.
pub fn summary_line(report: &SyncReport, highlighted_country: &str) -> String {
    let plural = if report.total_events == 1 { "" } else { "s" };
    let mut line = format!("{} gig{}", report.total_events, plural);

    if report.highlighted_events > 0 {
        let _ = write!(
            line,
            " (+ {} in {})",
            report.highlighted_events,
            country_label(highlighted_country)
        );
    }
    if report.new_events > 0 {
        let _ = write!(line, " - {} NEW", report.new_events);
    }

    line
}

fn country_label(country: &str) -> &str {
    match country {
        "United Kingdom" => "the UK",
        "United States" => "the US",
        other => other,
    }
}

/// Render the persisted log without touching the network
pub fn render_log_entries(entries: &[LogEntry]) -> String {
    let mut out = String::new();
    let new_count = entries.iter().filter(|e| e.was_new).count();
    let _ = writeln!(out, "Logged events: {}  New: {}", entries.len(), new_count);

    let rows: Vec<(String, &str, bool)> = entries
        .iter()
        .map(|e| (format!("{},  {}", e.country, e.city), e.date.as_str(), e.was_new))
        .collect();
    render_rows(&mut out, &rows);

    out
}

fn render_rows(out: &mut String, rows: &[(String, &str, bool)]) {
    if rows.is_empty() {
        let _ = writeln!(out, "  (no events)");
        return;
    }

    let width = rows.iter().map(|(label, _, _)| label.chars().count()).max().unwrap_or(0);
    for (label, date, is_new) in rows {
        let marker = if *is_new { NEW_MARKER } else { " " };
        let _ = writeln!(out, "{} {:<width$}  {}", marker, label, date, width = width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, RefreshMode};
    use chrono::{TimeZone, Utc};

    fn report(events: Vec<Event>, highlighted: usize) -> SyncReport {
        let new_events = events.iter().filter(|e| e.is_new).count();
        SyncReport {
            total_events: events.len(),
            highlighted_events: highlighted,
            new_events,
            mode: RefreshMode::Manual,
            completed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            events,
        }
    }

    #[test]
    fn test_render_report_rows() {
        let mut paris = Event::new("France", "Paris", "06 Jun");
        paris.is_new = true;
        let lyon = Event::new("France", "Lyon", "08 Jun");

        let text = render_report(&report(vec![paris, lyon], 2), "Sum 41", "United Kingdom");

        assert!(text.starts_with("Sum 41 (manual refresh at 2024-05-01 12:00:00 UTC)\n"));
        assert!(text.contains("2 gigs (+ 2 in the UK) - 1 NEW\n"));
        assert!(text.contains("Status: 1\n"));
        assert!(text.contains("* France,  Paris  06 Jun\n"));
        assert!(text.contains("  France,  Lyon   08 Jun\n"));
    }

    #[test]
    fn test_render_report_without_new_events_has_no_status() {
        let events = vec![Event::new("Italy", "Rome", "10 Jun")];
        let text = render_report(&report(events, 0), "Sum 41", "United Kingdom");
        assert!(text.contains("1 gig\n"));
        assert!(!text.contains("Status:"));
    }

    #[test]
    fn test_render_empty_report() {
        let text = render_report(&report(Vec::new(), 0), "Sum 41", "United Kingdom");
        assert!(text.contains("0 gigs\n"));
        assert!(text.contains("(no events)"));
    }

    #[test]
    fn test_summary_line_names_other_highlighted_country() {
        let mut berlin = Event::new("Germany", "Berlin", "12 Jul");
        berlin.is_new = true;
        let summary = summary_line(&report(vec![berlin], 3), "Ireland");
        assert_eq!(summary, "1 gig (+ 3 in Ireland) - 1 NEW");
    }

    #[test]
    fn test_render_log_entries() {
        let entries = vec![LogEntry {
            country: "Spain".to_string(),
            city: "Madrid".to_string(),
            date: "08 Jun".to_string(),
            was_new: true,
        }];

        let text = render_log_entries(&entries);
        assert!(text.contains("Logged events: 1  New: 1\n"));
        assert!(text.contains("* Spain,  Madrid  08 Jun\n"));
    }
}
