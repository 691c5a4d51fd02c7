//! The calendar backend as seen by the rest of the crate. The
//! `CalendarGateway` trait is the only way tools and routes touch a
//! calendar so they can be run against a fake in tests.

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use serde::Serialize;

use crate::core::error::PlannerError;
use crate::core::time::Instant;

/// Bounds for a listing. An open `max` lists everything upcoming.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeRange {
    pub min: DateTime<Utc>,
    pub max: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: Instant,
    pub end: Instant,
    pub status: Option<String>,
    pub html_link: Option<String>,
}

impl CalendarEvent {
    pub fn busy_interval(&self) -> BusyInterval {
        BusyInterval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn summary_or_default(&self) -> &str {
        self.summary.as_deref().unwrap_or("No title")
    }
}

/// Compact representation handed to the model and API clients.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EventSummary {
    pub id: String,
    pub summary: String,
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

impl From<&CalendarEvent> for EventSummary {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            id: event.id.clone(),
            summary: event.summary_or_default().to_string(),
            start: event.start.to_string(),
            end: event.end.to_string(),
            status: event.status.clone(),
            html_link: event.html_link.clone(),
        }
    }
}

/// A commitment reported by the calendar. Date-only ends are
/// exclusive, matching how the backend reports all-day events, so
/// both bounds resolve with `Instant::start_in`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BusyInterval {
    pub start: Instant,
    pub end: Instant,
}

/// Start or end of an event to create. Date values are exclusive on
/// the end bound.
#[derive(Clone, Debug, PartialEq)]
pub enum EventTime {
    At(DateTime<Utc>),
    Date(chrono::NaiveDate),
}

/// Turn user supplied bounds into event times. Both must be dates or
/// both date-times. A date-only end is inclusive here and becomes the
/// exclusive following day.
pub fn event_bounds(start: Instant, end: Instant) -> Result<(EventTime, EventTime), PlannerError> {
    match (start, end) {
        (Instant::Date(start), Instant::Date(end)) => {
            if end < start {
                return Err(PlannerError::validation("end date is before start date"));
            }
            let end = end
                .checked_add_days(Days::new(1))
                .ok_or_else(|| PlannerError::validation("end date is out of range"))?;
            Ok((EventTime::Date(start), EventTime::Date(end)))
        }
        (Instant::At(start), Instant::At(end)) => {
            if end <= start {
                return Err(PlannerError::validation("end must be after start"));
            }
            Ok((EventTime::At(start), EventTime::At(end)))
        }
        _ => Err(PlannerError::validation(
            "start and end must both be dates (YYYY-MM-DD) or both date-times",
        )),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub attendees: Vec<String>,
}

/// Fields to change on an existing event. `None` leaves the field as
/// it is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventPatch {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }
}

#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Events in `range` ordered by start time with recurring events
    /// expanded into single instances.
    async fn list_events(
        &self,
        range: &TimeRange,
        max_results: u32,
    ) -> Result<Vec<CalendarEvent>, PlannerError>;

    async fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent, PlannerError>;

    async fn delete_event(&self, event_id: &str) -> Result<(), PlannerError>;

    async fn update_event(
        &self,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<CalendarEvent, PlannerError>;
}
