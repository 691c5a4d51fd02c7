//! Public types for the suggest API
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct SuggestQuery {
    pub duration_min: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuggestResponse {
    pub start: String,
    pub end: String,
}
