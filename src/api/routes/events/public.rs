//! Public types for the events API
use serde::{Deserialize, Serialize};

use crate::calendar::EventSummary;

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// A single day (YYYY-MM-DD) in the configured time zone. Omit to
    /// list upcoming events.
    pub date: Option<String>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub count: usize,
    pub events: Vec<EventSummary>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub summary: String,
    pub start: String,
    pub end: String,
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    pub created: bool,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}
