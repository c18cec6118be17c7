//! Parsing of the wall-clock date/time strings produced by UI forms.
//!
//! Scheduled times are office-local and carry no timezone, so they are kept
//! as [`NaiveDateTime`]. RFC 3339 input is accepted and reduced to the local
//! time it names.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

/// Formats accepted for a date plus time, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date plus time. Returns `None` for blank or unparsable input.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Parse a deadline. A bare date (`2025-03-01`) is taken as the start of that day.
pub fn parse_deadline(input: &str) -> Option<NaiveDateTime> {
    parse_datetime(input).or_else(|| {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Whether two times fall on the same calendar day and the same hour-of-day.
///
/// Minutes are ignored: 14:00 and 14:59 match, 14:59 and 15:01 do not.
pub fn same_day_and_hour(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour()
}
