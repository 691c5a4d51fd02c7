//! Public types for the ask API
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
    /// Prior turns as a JSON encoded string or as a list of
    /// `{"role", "content"}` objects.
    #[serde(default)]
    pub history: Option<Value>,
}

impl AskRequest {
    /// History in the serialized form the normalizer expects.
    pub fn raw_history(&self) -> Option<String> {
        match &self.history {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(raw.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub answer: String,
    pub operation: Option<String>,
}
