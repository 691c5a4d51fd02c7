//! Public types for the agent API
use serde::{Deserialize, Serialize};

use crate::api::public::{ask, events};

/// A request to the single agent entry point. The `operation` field
/// picks the variant and the remaining fields are its arguments.
#[derive(Debug, Deserialize)]
#[serde(tag = "operation")]
pub enum AgentRequest {
    #[serde(rename = "ask")]
    Ask(ask::AskRequest),
    #[serde(rename = "listEvents")]
    ListEvents(events::EventsQuery),
    #[serde(rename = "createEvent")]
    CreateEvent(events::CreateEventRequest),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AgentResponse {
    Ask(ask::AskResponse),
    ListEvents(events::EventsResponse),
    CreateEvent(events::CreateEventResponse),
}
