//! Normalizes date/time strings coming from requests, tool arguments
//! and calendar responses.
//!
//! Accepted inputs:
//! - RFC 3339 with an offset (`2025-01-01T09:00:00Z`,
//!   `2025-01-01T09:00:00-03:00`) is an absolute instant
//! - A local date-time without an offset (`2025-01-01T09:00`) is
//!   resolved in the zone supplied by the caller
//! - A bare `YYYY-MM-DD` is a date-only value
//!
//! Expanding a date-only value into a full day is done by whoever
//! uses it as a range boundary (see `Instant::start_in` and
//! `Instant::end_in`).

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

use super::error::PlannerError;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const EXPECTED_FORMATS: &str = "expected an RFC 3339 date-time (2025-01-01T09:00:00Z), a local date-time (2025-01-01T09:00) or a date (YYYY-MM-DD)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instant {
    At(DateTime<Utc>),
    Date(NaiveDate),
}

impl Instant {
    pub fn is_date_only(&self) -> bool {
        matches!(self, Instant::Date(_))
    }

    /// The instant itself, or midnight at the start of the day for
    /// date-only values.
    pub fn start_in<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        match self {
            Instant::At(dt) => dt.with_timezone(zone),
            Instant::Date(date) => midnight(*date, zone),
        }
    }

    /// The instant itself, or midnight at the start of the following
    /// day for date-only values, so a date covers [00:00, 24:00).
    pub fn end_in<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        match self {
            Instant::At(dt) => dt.with_timezone(zone),
            Instant::Date(date) => {
                let next = date.checked_add_days(Days::new(1)).unwrap_or(*date);
                midnight(next, zone)
            }
        }
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instant::At(dt) => write!(f, "{}", format_utc(dt)),
            Instant::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

fn midnight<Tz: TimeZone>(date: NaiveDate, zone: &Tz) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    // Some zones skip midnight on DST transitions
    zone.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| zone.from_utc_datetime(&naive))
}

/// Parse `text` into an `Instant`, resolving offset-less date-times
/// in `zone`. Never substitutes a default on failure.
pub fn parse<Tz: TimeZone>(text: &str, zone: &Tz) -> Result<Instant, PlannerError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlannerError::validation(format!(
            "Empty date/time: {}",
            EXPECTED_FORMATS
        )));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Instant::At(dt.with_timezone(&Utc)));
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return resolve_local(naive, zone)
                .map(Instant::At)
                .ok_or_else(|| {
                    PlannerError::validation(format!(
                        "'{}' does not exist in the configured time zone",
                        text
                    ))
                });
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Instant::Date(date));
    }

    Err(PlannerError::validation(format!(
        "Invalid date/time '{}': {}",
        text, EXPECTED_FORMATS
    )))
}

// Ambiguous wall clock times (DST fall back) take the earlier instant
fn resolve_local<Tz: TimeZone>(naive: NaiveDateTime, zone: &Tz) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, PlannerError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::validation("date must be YYYY-MM-DD"))
}

/// RFC 3339 with a trailing `Z`, which is what the calendar API
/// expects for range queries.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
