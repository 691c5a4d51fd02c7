//! Router for the suggest API

use axum::{Router, extract::State, response::Json, routing::get};
use axum_extra::extract::Query;
use chrono::Utc;

use super::public;
use crate::ai::slots::next_free_slot;
use crate::ai::tools::find_free_slot::DEFAULT_DURATION_MINUTES;
use crate::api::auth::AgentAuth;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::core::AppConfig;
use crate::core::error::PlannerError;
use crate::google::GoogleCalendar;

/// Earliest free block from now. The result is the block that was
/// found, never just the current time.
pub async fn suggest(
    config: &AppConfig,
    query: &public::SuggestQuery,
) -> Result<public::SuggestResponse, PlannerError> {
    let duration = query.duration_min.unwrap_or(DEFAULT_DURATION_MINUTES);
    let calendar = GoogleCalendar::from_config(config)?;
    let now = Utc::now().with_timezone(&config.time_zone);
    let slot = next_free_slot(&calendar, &now, duration).await?;

    Ok(public::SuggestResponse {
        start: slot.start.to_rfc3339(),
        end: slot.end.to_rfc3339(),
    })
}

async fn suggest_handler(
    _auth: AgentAuth,
    State(state): State<SharedState>,
    Query(params): Query<public::SuggestQuery>,
) -> Result<Json<public::SuggestResponse>, ApiError> {
    let resp = suggest(&state.config, &params).await?;
    Ok(Json(resp))
}

/// Create the suggest router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(suggest_handler))
}
