//! Best-effort date/time parsing for stored string values.
//!
//! hstore values carry no type information, so timestamps arrive in whatever
//! textual form the writer used. Parsing tries a fixed table of common
//! formats and degrades to `None` when nothing matches; callers map that to
//! the zero-timestamp sentinel.
//!
//! Pipeline: trim → offset-carrying formats (RFC 3339/2822) → naive
//! date-time formats (assumed UTC) → date-only formats → integer Unix epoch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;

/// Naive date-time formats, tried in order. All are interpreted as UTC.
///
/// The `%.f` specifier matches an optional fractional-seconds part, so each
/// entry covers both the plain and sub-second spellings.
static DATETIME_FORMATS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // chrono's own Display form for DateTime<Utc>
        "%Y-%m-%d %H:%M:%S%.f UTC",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S%.f",
        "%m/%d/%Y %H:%M",
        "%d %b %Y %H:%M:%S",
    ]
});

/// Date-only formats, tried after the date-time table. Midnight UTC.
static DATE_FORMATS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d %b %Y",
        "%B %d, %Y",
    ]
});

/// Parse a textual timestamp without a fixed format string.
///
/// Returns `None` when no known format matches. Inputs without an explicit
/// offset are taken as UTC.
///
/// # Example
///
/// ```
/// use chrono::{Datelike, Timelike};
///
/// let t = hstore::dateparse::parse_any("2024-03-09 14:30:00").unwrap();
/// assert_eq!((t.year(), t.month(), t.day()), (2024, 3, 9));
/// assert_eq!(t.hour(), 14);
/// ```
pub fn parse_any(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(s) {
        return Some(t.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS.iter() {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&t));
        }
    }

    for fmt in DATE_FORMATS.iter() {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
        }
    }

    // Bare integer: seconds since the Unix epoch.
    if let Ok(secs) = s.parse::<i64>() {
        return Utc.timestamp_opt(secs, 0).single();
    }

    None
}
