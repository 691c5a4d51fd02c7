//! Earliest-fit search for an open block of time between busy
//! intervals.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::calendar::{BusyInterval, CalendarGateway, TimeRange};
use crate::core::error::PlannerError;

/// Upper bound on events pulled when searching for a free slot.
pub const SLOT_SEARCH_MAX_RESULTS: u32 = 250;

#[derive(Clone, Debug, PartialEq)]
pub struct Slot<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Find the first gap of at least `duration_minutes` on or after
/// `reference`.
///
/// `busy` must already be sorted by start and every interval must
/// have `start <= end`. Nothing here sorts or validates it. Date-only
/// bounds are resolved in the zone of `reference`.
pub fn find_slot<Tz: TimeZone>(
    busy: &[BusyInterval],
    reference: &DateTime<Tz>,
    duration_minutes: u32,
) -> Slot<Tz> {
    let zone = reference.timezone();
    let duration = Duration::minutes(i64::from(duration_minutes));
    let mut free_from = reference.clone();

    for interval in busy {
        let start = interval.start.start_in(&zone);
        if start.clone() - free_from.clone() >= duration {
            break;
        }
        // Overlapping intervals that end earlier never move the
        // cursor backwards
        let end = interval.end.start_in(&zone);
        if end > free_from {
            free_from = end;
        }
    }

    Slot {
        end: free_from.clone() + duration,
        start: free_from,
    }
}

/// Look up upcoming events on `gateway` and return the first free
/// block after `reference`.
pub async fn next_free_slot<Tz: TimeZone>(
    gateway: &dyn CalendarGateway,
    reference: &DateTime<Tz>,
    duration_minutes: u32,
) -> Result<Slot<Tz>, PlannerError> {
    if duration_minutes == 0 {
        return Err(PlannerError::validation(
            "duration_minutes must be greater than zero",
        ));
    }
    let range = TimeRange {
        min: reference.with_timezone(&Utc),
        max: None,
    };
    let events = gateway
        .list_events(&range, SLOT_SEARCH_MAX_RESULTS)
        .await?;
    let busy: Vec<BusyInterval> = events.iter().map(|e| e.busy_interval()).collect();
    tracing::debug!(
        "Searching {} busy intervals for a {} minute slot",
        busy.len(),
        duration_minutes
    );
    Ok(find_slot(&busy, reference, duration_minutes))
}
