//! Router for the plan API

use axum::{Router, extract::State, response::Json, routing::post};
use chrono::Utc;
use chrono_tz::Tz;
use serde_json::{Value, json};

use super::public;
use crate::ai::prompt::{PlanEvent, day_plan_prompt};
use crate::api::auth::AgentAuth;
use crate::api::public::{ApiError, JsonBody};
use crate::api::state::SharedState;
use crate::calendar::{CalendarEvent, CalendarGateway, TimeRange};
use crate::core::AppConfig;
use crate::core::error::PlannerError;
use crate::core::time::{self, Instant};
use crate::google::GoogleCalendar;
use crate::openai::{Message, Reply, Role, completion};

const PLAN_MAX_RESULTS: u32 = 250;
const PLANNER_PERSONA: &str = "You are a practical daily planning assistant.";

fn plan_event(event: &CalendarEvent, zone: &Tz) -> PlanEvent {
    let clock = |instant: &Instant| match instant {
        Instant::At(dt) => dt.with_timezone(zone).format("%H:%M").to_string(),
        Instant::Date(_) => String::from("all day"),
    };
    PlanEvent {
        start: clock(&event.start),
        end: clock(&event.end),
        summary: event.summary_or_default().to_string(),
    }
}

/// Models often wrap JSON in a markdown code fence.
fn parse_plan(text: &str) -> Value {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced.trim()).unwrap_or_else(|_| json!({"raw": text}))
}

pub async fn plan(
    config: &AppConfig,
    request: &public::PlanRequest,
) -> Result<public::PlanResponse, PlannerError> {
    let zone = config.time_zone;
    let date = match request.date.as_deref() {
        Some(date) => time::parse_date(date)?,
        None => Utc::now().with_timezone(&zone).date_naive(),
    };

    let openai = config.openai()?;
    let calendar = GoogleCalendar::from_config(config)?;

    let day = Instant::Date(date);
    let range = TimeRange {
        min: day.start_in(&zone).with_timezone(&Utc),
        max: Some(day.end_in(&zone).with_timezone(&Utc)),
    };
    let events = calendar.list_events(&range, PLAN_MAX_RESULTS).await?;
    let plan_events: Vec<PlanEvent> = events.iter().map(|e| plan_event(e, &zone)).collect();
    let date = date.format("%Y-%m-%d").to_string();
    let prompt = day_plan_prompt(&date, &plan_events, &request.tasks)?;

    let messages = vec![
        Message::new(Role::System, PLANNER_PERSONA),
        Message::new(Role::User, &prompt),
    ];
    let resp = completion(
        &messages,
        &[],
        &openai.api_hostname,
        &openai.api_key,
        &openai.model,
    )
    .await?;
    let text = Reply::from_response(&resp)?.content.unwrap_or_default();

    Ok(public::PlanResponse {
        date,
        events_count: events.len(),
        plan: parse_plan(&text),
    })
}

async fn plan_handler(
    _auth: AgentAuth,
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<public::PlanRequest>,
) -> Result<Json<public::PlanResponse>, ApiError> {
    let resp = plan(&state.config, &request).await?;
    Ok(Json(resp))
}

/// Create the plan router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(plan_handler))
}
