//! Router for the agent API

use axum::{Router, extract::State, response::Json, routing::post};
use serde_json::Value;

use super::public::{AgentRequest, AgentResponse};
use crate::api::auth::AgentAuth;
use crate::api::public::{ApiError, JsonBody};
use crate::api::routes::{ask, events};
use crate::api::state::SharedState;
use crate::core::error::PlannerError;

async fn agent_handler(
    _auth: AgentAuth,
    State(state): State<SharedState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<AgentResponse>, ApiError> {
    // Decoded by hand so an unknown operation is a 400 with a message
    let request: AgentRequest = serde_json::from_value(body).map_err(|e| {
        PlannerError::validation(format!(
            "Invalid agent request, expected operation ask, listEvents or createEvent: {}",
            e
        ))
    })?;
    let config = &state.config;

    let resp = match request {
        AgentRequest::Ask(req) => AgentResponse::Ask(ask::ask(config, &req).await?),
        AgentRequest::ListEvents(query) => {
            AgentResponse::ListEvents(events::list_events(config, &query).await?)
        }
        AgentRequest::CreateEvent(req) => {
            AgentResponse::CreateEvent(events::create_event(config, &req).await?)
        }
    };
    Ok(Json(resp))
}

/// Create the agent router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(agent_handler))
}
