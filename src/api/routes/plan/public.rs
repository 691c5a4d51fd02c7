//! Public types for the plan API
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct PlanRequest {
    /// Day to plan (YYYY-MM-DD). Defaults to today in the configured
    /// time zone.
    pub date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub date: String,
    pub events_count: usize,
    /// The model's plan, or `{"raw": text}` when it didn't reply with
    /// JSON.
    pub plan: Value,
}
