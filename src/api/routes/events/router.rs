//! Router for the events API

use axum::{Router, extract::State, response::Json, routing::get};
use axum_extra::extract::Query;
use chrono::Utc;

use super::public;
use crate::api::auth::AgentAuth;
use crate::api::public::{ApiError, JsonBody};
use crate::api::state::SharedState;
use crate::calendar::{CalendarGateway, EventSummary, NewEvent, TimeRange, event_bounds};
use crate::core::AppConfig;
use crate::core::error::PlannerError;
use crate::core::time::{self, Instant};
use crate::google::GoogleCalendar;

const DEFAULT_MAX_RESULTS: u32 = 50;
const MAX_RESULTS_LIMIT: u32 = 250;

pub async fn list_events(
    config: &AppConfig,
    query: &public::EventsQuery,
) -> Result<public::EventsResponse, PlannerError> {
    let range = match query.date.as_deref() {
        Some(date) => {
            let day = Instant::Date(time::parse_date(date)?);
            TimeRange {
                min: day.start_in(&config.time_zone).with_timezone(&Utc),
                max: Some(day.end_in(&config.time_zone).with_timezone(&Utc)),
            }
        }
        None => TimeRange {
            min: Utc::now(),
            max: None,
        },
    };
    let max_results = query
        .max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .clamp(1, MAX_RESULTS_LIMIT);

    let calendar = GoogleCalendar::from_config(config)?;
    let events = calendar.list_events(&range, max_results).await?;
    let events: Vec<EventSummary> = events.iter().map(EventSummary::from).collect();

    Ok(public::EventsResponse {
        count: events.len(),
        events,
    })
}

pub async fn create_event(
    config: &AppConfig,
    request: &public::CreateEventRequest,
) -> Result<public::CreateEventResponse, PlannerError> {
    let summary = request.summary.trim();
    if summary.is_empty() {
        return Err(PlannerError::validation("summary must not be empty"));
    }
    let start = time::parse(&request.start, &config.time_zone)?;
    let end = time::parse(&request.end, &config.time_zone)?;
    let (start, end) = event_bounds(start, end)?;

    let calendar = GoogleCalendar::from_config(config)?;
    let created = calendar
        .create_event(&NewEvent {
            summary: summary.to_string(),
            description: request.description.clone(),
            start,
            end,
            attendees: request.attendees.clone(),
        })
        .await?;
    tracing::info!("Created event {}", created.id);

    Ok(public::CreateEventResponse {
        created: true,
        id: created.id,
        html_link: created.html_link,
    })
}

async fn list_events_handler(
    _auth: AgentAuth,
    State(state): State<SharedState>,
    Query(params): Query<public::EventsQuery>,
) -> Result<Json<public::EventsResponse>, ApiError> {
    let resp = list_events(&state.config, &params).await?;
    Ok(Json(resp))
}

async fn create_event_handler(
    _auth: AgentAuth,
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<public::CreateEventRequest>,
) -> Result<Json<public::CreateEventResponse>, ApiError> {
    let resp = create_event(&state.config, &request).await?;
    Ok(Json(resp))
}

/// Create the events router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(list_events_handler).post(create_event_handler))
}
