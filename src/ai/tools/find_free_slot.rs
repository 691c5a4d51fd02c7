use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ToolFailure, ToolRegistry};
use crate::ai::slots::next_free_slot;
use crate::openai::{Function, Parameters, Property, ToolDefinition, ToolType};

pub const NAME: &str = "find_free_slot";

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

#[derive(Serialize)]
pub struct FindFreeSlotProps {
    pub duration_minutes: Property,
    pub after: Property,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FindFreeSlotArgs {
    pub duration_minutes: Option<u32>,
    pub after: Option<String>,
}

pub fn definition() -> ToolDefinition<FindFreeSlotProps> {
    ToolDefinition {
        r#type: ToolType::Function,
        function: Function {
            name: String::from(NAME),
            description: String::from(
                "Find the earliest free block of time on the user's calendar that fits the requested duration.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: FindFreeSlotProps {
                    duration_minutes: Property::new("integer", "Length of the block in minutes.")
                        .with_default(json!(DEFAULT_DURATION_MINUTES)),
                    after: Property::new(
                        "string",
                        "Only consider time after this date or ISO 8601 date-time. Defaults to now.",
                    ),
                },
                required: vec![],
                additional_properties: false,
            },
            strict: false,
        },
    }
}

pub async fn run(registry: &ToolRegistry<'_>, args: &FindFreeSlotArgs) -> Result<Value, ToolFailure> {
    let zone = registry.time_zone();
    let duration = args.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
    let reference = match args.after.as_deref() {
        Some(after) => registry.parse_time(after)?.start_in(&zone),
        None => registry.now().with_timezone(&zone),
    };
    let slot = next_free_slot(registry.gateway(), &reference, duration).await?;

    Ok(json!({
        "start": slot.start.to_rfc3339(),
        "end": slot.end.to_rfc3339(),
        "duration_minutes": duration
    }))
}
