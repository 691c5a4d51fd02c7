use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ToolFailure, ToolRegistry};
use crate::calendar::{EventSummary, NewEvent, event_bounds};
use crate::core::error::PlannerError;
use crate::openai::{Function, Parameters, Property, ToolDefinition, ToolType};

pub const NAME: &str = "create_event";

#[derive(Serialize)]
pub struct CreateEventProps {
    pub summary: Property,
    pub start: Property,
    pub end: Property,
    pub description: Property,
    pub attendees: Property,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CreateEventArgs {
    pub summary: String,
    pub start: String,
    pub end: String,
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

pub fn definition() -> ToolDefinition<CreateEventProps> {
    ToolDefinition {
        r#type: ToolType::Function,
        function: Function {
            name: String::from(NAME),
            description: String::from("Create a new event on the user's calendar."),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: CreateEventProps {
                    summary: Property::new("string", "Title of the event."),
                    start: Property::new(
                        "string",
                        "Start as an ISO 8601 date-time, or a date (YYYY-MM-DD) for an all-day event.",
                    ),
                    end: Property::new(
                        "string",
                        "End as an ISO 8601 date-time, or the last date (YYYY-MM-DD) of an all-day event.",
                    ),
                    description: Property::new("string", "Optional notes for the event."),
                    attendees: Property::array_of("string", "Email addresses to invite."),
                },
                required: vec![
                    String::from("summary"),
                    String::from("start"),
                    String::from("end"),
                ],
                additional_properties: false,
            },
            strict: false,
        },
    }
}

pub async fn run(registry: &ToolRegistry<'_>, args: &CreateEventArgs) -> Result<Value, ToolFailure> {
    let summary = args.summary.trim();
    if summary.is_empty() {
        return Err(PlannerError::validation("summary must not be empty").into());
    }
    let start = registry.parse_time(&args.start)?;
    let end = registry.parse_time(&args.end)?;
    let (start, end) = event_bounds(start, end)?;

    let event = NewEvent {
        summary: summary.to_string(),
        description: args.description.clone(),
        start,
        end,
        attendees: args.attendees.clone(),
    };
    let created = registry.gateway().create_event(&event).await?;
    tracing::info!("Created event {}", created.id);

    Ok(json!({
        "created": true,
        "event": EventSummary::from(&created)
    }))
}
