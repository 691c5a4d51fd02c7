use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ToolFailure, ToolRegistry};
use crate::openai::{Function, Parameters, Property, ToolDefinition, ToolType};

pub const NAME: &str = "delete_event";

#[derive(Serialize)]
pub struct DeleteEventProps {
    pub event_id: Property,
    pub query: Property,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DeleteEventArgs {
    pub event_id: Option<String>,
    pub query: Option<String>,
}

pub fn definition() -> ToolDefinition<DeleteEventProps> {
    ToolDefinition {
        r#type: ToolType::Function,
        function: Function {
            name: String::from(NAME),
            description: String::from(
                "Delete an event from the user's calendar. Requires the event_id from list_events. Without it, matching candidates are returned and nothing is deleted.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: DeleteEventProps {
                    event_id: Property::new("string", "Id of the event to delete."),
                    query: Property::new(
                        "string",
                        "Words from the event title, used to list candidates when the id is unknown.",
                    ),
                },
                required: vec![],
                additional_properties: false,
            },
            strict: false,
        },
    }
}

pub async fn run(registry: &ToolRegistry<'_>, args: &DeleteEventArgs) -> Result<Value, ToolFailure> {
    let event_id = registry
        .resolve_event_id(args.event_id.as_deref(), args.query.as_deref(), "delete")
        .await?;
    registry.gateway().delete_event(&event_id).await?;
    tracing::info!("Deleted event {}", event_id);

    Ok(json!({"deleted": true, "id": event_id}))
}
