//! Router for the ask API

use axum::{Router, extract::State, response::Json, routing::post};
use chrono::Utc;

use super::public;
use crate::ai::chat::{Chat, normalize_history};
use crate::ai::prompt::scheduling_prompt;
use crate::ai::tools::ToolRegistry;
use crate::api::auth::AgentAuth;
use crate::api::public::{ApiError, JsonBody};
use crate::api::state::SharedState;
use crate::core::AppConfig;
use crate::core::error::PlannerError;
use crate::google::GoogleCalendar;

/// Answer a scheduling question, running at most one calendar
/// operation along the way.
pub async fn ask(
    config: &AppConfig,
    request: &public::AskRequest,
) -> Result<public::AskResponse, PlannerError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(PlannerError::validation("query must not be empty"));
    }

    // Fail before any network call if either backend is missing
    let openai = config.openai()?;
    let calendar = GoogleCalendar::from_config(config)?;

    let now = Utc::now();
    let zone = config.time_zone;
    let system_message = scheduling_prompt(
        &config.system_message,
        &now.with_timezone(&zone).to_rfc3339(),
        zone.name(),
    )?;
    let messages = normalize_history(request.raw_history().as_deref(), query);
    let registry = ToolRegistry::new(&calendar, zone, now);

    let outcome = Chat::builder(&openai.api_hostname, &openai.api_key, &openai.model)
        .system_message(&system_message)
        .transcript(messages)
        .build()
        .run(&registry)
        .await?;

    Ok(public::AskResponse {
        answer: outcome.answer,
        operation: outcome.operation,
    })
}

async fn ask_handler(
    _auth: AgentAuth,
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<public::AskRequest>,
) -> Result<Json<public::AskResponse>, ApiError> {
    let resp = ask(&state.config, &request).await?;
    Ok(Json(resp))
}

/// Create the ask router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(ask_handler))
}
