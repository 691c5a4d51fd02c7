use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ToolFailure, ToolRegistry};
use crate::calendar::{EventPatch, EventSummary, event_bounds};
use crate::core::error::PlannerError;
use crate::openai::{Function, Parameters, Property, ToolDefinition, ToolType};

pub const NAME: &str = "update_event";

#[derive(Serialize)]
pub struct UpdateEventProps {
    pub event_id: Property,
    pub query: Property,
    pub summary: Property,
    pub description: Property,
    pub start: Property,
    pub end: Property,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct UpdateEventArgs {
    pub event_id: Option<String>,
    pub query: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

pub fn definition() -> ToolDefinition<UpdateEventProps> {
    ToolDefinition {
        r#type: ToolType::Function,
        function: Function {
            name: String::from(NAME),
            description: String::from(
                "Change the title, notes or time of an existing event. Requires the event_id from list_events. Only the fields given are changed.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: UpdateEventProps {
                    event_id: Property::new("string", "Id of the event to change."),
                    query: Property::new(
                        "string",
                        "Words from the event title, used to list candidates when the id is unknown.",
                    ),
                    summary: Property::new("string", "New title."),
                    description: Property::new("string", "New notes."),
                    start: Property::new(
                        "string",
                        "New start as an ISO 8601 date-time or a date. Must be given together with end.",
                    ),
                    end: Property::new(
                        "string",
                        "New end as an ISO 8601 date-time or the last date of an all-day event. Must be given together with start.",
                    ),
                },
                required: vec![],
                additional_properties: false,
            },
            strict: false,
        },
    }
}

fn build_patch(registry: &ToolRegistry<'_>, args: &UpdateEventArgs) -> Result<EventPatch, PlannerError> {
    let mut patch = EventPatch {
        summary: args.summary.clone(),
        description: args.description.clone(),
        ..Default::default()
    };
    match (&args.start, &args.end) {
        (Some(start), Some(end)) => {
            let (start, end) = event_bounds(registry.parse_time(start)?, registry.parse_time(end)?)?;
            patch.start = Some(start);
            patch.end = Some(end);
        }
        (None, None) => {}
        _ => return Err(PlannerError::validation("start and end must be given together")),
    }
    if patch.is_empty() {
        return Err(PlannerError::validation("Nothing to update"));
    }
    Ok(patch)
}

pub async fn run(registry: &ToolRegistry<'_>, args: &UpdateEventArgs) -> Result<Value, ToolFailure> {
    // Validate before resolving so bad input never triggers a lookup
    let patch = build_patch(registry, args)?;
    let event_id = registry
        .resolve_event_id(args.event_id.as_deref(), args.query.as_deref(), "update")
        .await?;
    let updated = registry.gateway().update_event(&event_id, &patch).await?;
    tracing::info!("Updated event {}", updated.id);

    Ok(json!({
        "updated": true,
        "event": EventSummary::from(&updated)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::tools::ToolResult;
    use crate::calendar::testing::{FakeCalendar, timed_event};
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Sao_Paulo;

    fn registry(calendar: &FakeCalendar) -> ToolRegistry<'_> {
        ToolRegistry::new(
            calendar,
            Sao_Paulo,
            Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
        )
    }

    fn calendar() -> FakeCalendar {
        FakeCalendar::with_events(vec![
            timed_event("a", "Dentist", "2025-01-02T09:00:00Z", "2025-01-02T10:00:00Z"),
            timed_event("b", "Dentist", "2025-01-03T09:00:00Z", "2025-01-03T10:00:00Z"),
        ])
    }

    #[tokio::test]
    async fn test_update_summary() {
        let calendar = calendar();
        let result = registry(&calendar)
            .call(NAME, r#"{"event_id": "a", "summary": "Orthodontist"}"#)
            .await;
        let ToolResult::Success(value) = result else {
            panic!("Expected success");
        };
        assert_eq!(value["updated"], true);
        assert_eq!(value["event"]["summary"], "Orthodontist");
        assert_eq!(calendar.calls(), vec!["update a"]);
    }

    #[tokio::test]
    async fn test_update_without_id_returns_candidates() {
        let calendar = calendar();
        let result = registry(&calendar)
            .call(NAME, r#"{"query": "dentist", "summary": "Moved"}"#)
            .await;
        let ToolResult::Error(failure) = result else {
            panic!("Expected candidates");
        };
        assert_eq!(failure.candidates.len(), 2);
        assert!(
            calendar
                .calls()
                .iter()
                .all(|call| !call.starts_with("update"))
        );
    }

    #[tokio::test]
    async fn test_update_requires_changes() {
        let calendar = calendar();
        let result = registry(&calendar)
            .call(NAME, r#"{"event_id": "a"}"#)
            .await;
        assert_eq!(
            result,
            ToolResult::Error(ToolFailure::new("Nothing to update"))
        );
        assert!(calendar.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_half_a_time_range() {
        let calendar = calendar();
        let result = registry(&calendar)
            .call(NAME, r#"{"event_id": "a", "start": "2025-01-02T11:00"}"#)
            .await;
        assert_eq!(
            result,
            ToolResult::Error(ToolFailure::new("start and end must be given together"))
        );
        assert!(calendar.calls().is_empty());
    }
}
