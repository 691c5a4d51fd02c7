//! API routes module

pub mod agent;
pub mod ask;
pub mod events;
pub mod plan;
pub mod suggest;

use axum::{Router, extract::State, response::Json, routing::get};
use serde_json::{Value, json};

use crate::api::state::SharedState;

async fn ping(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "calendar_configured": state.config.calendar_configured(),
        "openai_configured": state.config.openai_configured()
    }))
}

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Health check, never authenticated
        .route("/ping", get(ping))
        // Single entry point dispatching on `operation`
        .nest("/agent", agent::router())
        // Conversational scheduling
        .nest("/ask", ask::router())
        // Direct calendar access
        .nest("/events", events::router())
        .nest("/suggest", suggest::router())
        // Day planning
        .nest("/plan", plan::router())
}
