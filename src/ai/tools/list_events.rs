use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ToolFailure, ToolRegistry};
use crate::calendar::{EventSummary, TimeRange};
use crate::core::error::PlannerError;
use crate::core::time::Instant;
use crate::openai::{Function, Parameters, Property, ToolDefinition, ToolType};

pub const NAME: &str = "list_events";

const DEFAULT_MAX_RESULTS: u32 = 50;
const MAX_RESULTS_LIMIT: u32 = 250;

#[derive(Serialize)]
pub struct ListEventsProps {
    pub time_min: Property,
    pub time_max: Property,
    pub max_results: Property,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ListEventsArgs {
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    pub max_results: Option<u32>,
}

pub fn definition() -> ToolDefinition<ListEventsProps> {
    ToolDefinition {
        r#type: ToolType::Function,
        function: Function {
            name: String::from(NAME),
            description: String::from(
                "List events on the user's calendar ordered by start time. Use this to answer questions about the schedule and to look up event ids.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: ListEventsProps {
                    time_min: Property::new(
                        "string",
                        "Start of the range as a date (YYYY-MM-DD) or ISO 8601 date-time. Defaults to now. A date on its own with no time_max lists that whole day.",
                    ),
                    time_max: Property::new(
                        "string",
                        "End of the range as a date (inclusive) or ISO 8601 date-time. Omit for everything upcoming.",
                    ),
                    max_results: Property::new("integer", "Maximum number of events to return.")
                        .with_default(json!(DEFAULT_MAX_RESULTS)),
                },
                required: vec![],
                additional_properties: false,
            },
            strict: false,
        },
    }
}

pub async fn run(registry: &ToolRegistry<'_>, args: &ListEventsArgs) -> Result<Value, ToolFailure> {
    let zone = registry.time_zone();
    let time_min = args
        .time_min
        .as_deref()
        .map(|t| registry.parse_time(t))
        .transpose()?;
    let time_max = args
        .time_max
        .as_deref()
        .map(|t| registry.parse_time(t))
        .transpose()?;

    let min = time_min
        .map(|t| t.start_in(&zone).with_timezone(&Utc))
        .unwrap_or(registry.now());
    let max = match (time_max, time_min) {
        (Some(max), _) => Some(max.end_in(&zone).with_timezone(&Utc)),
        (None, Some(day @ Instant::Date(_))) => Some(day.end_in(&zone).with_timezone(&Utc)),
        _ => None,
    };
    if let Some(max) = max
        && max <= min
    {
        return Err(PlannerError::validation("time_max must be after time_min").into());
    }

    let max_results = args
        .max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .clamp(1, MAX_RESULTS_LIMIT);
    let events = registry
        .gateway()
        .list_events(&TimeRange { min, max }, max_results)
        .await?;
    let events: Vec<EventSummary> = events.iter().map(EventSummary::from).collect();

    Ok(json!({
        "count": events.len(),
        "events": events
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::tools::ToolResult;
    use crate::calendar::testing::{FakeCalendar, timed_event};
    use chrono::{DateTime, TimeZone};
    use chrono_tz::America::Sao_Paulo;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_list_events_defaults_to_upcoming() {
        let calendar = FakeCalendar::with_events(vec![timed_event(
            "a",
            "Standup",
            "2025-01-01T09:00:00Z",
            "2025-01-01T09:15:00Z",
        )]);
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let result = registry.call(NAME, "{}").await;
        let ToolResult::Success(value) = result else {
            panic!("Expected success");
        };
        assert_eq!(value["count"], 1);
        assert_eq!(value["events"][0]["summary"], "Standup");
        assert_eq!(value["events"][0]["start"], "2025-01-01T09:00:00Z");

        let expected = TimeRange {
            min: now(),
            max: None,
        };
        assert_eq!(calendar.calls(), vec![format!("list {:?} 50", expected)]);
    }

    #[tokio::test]
    async fn test_list_events_single_day_in_user_zone() {
        let calendar = FakeCalendar::default();
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        registry
            .call(NAME, r#"{"time_min": "2025-01-02", "max_results": 5}"#)
            .await;
        let expected = TimeRange {
            min: Utc.with_ymd_and_hms(2025, 1, 2, 3, 0, 0).unwrap(),
            max: Some(Utc.with_ymd_and_hms(2025, 1, 3, 3, 0, 0).unwrap()),
        };
        assert_eq!(calendar.calls(), vec![format!("list {:?} 5", expected)]);
    }

    #[tokio::test]
    async fn test_list_events_inverted_range_is_rejected() {
        let calendar = FakeCalendar::default();
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let result = registry
            .call(
                NAME,
                r#"{"time_min": "2025-01-05T10:00:00Z", "time_max": "2025-01-04T10:00:00Z"}"#,
            )
            .await;
        assert_eq!(
            result,
            ToolResult::Error(ToolFailure::new("time_max must be after time_min"))
        );
        assert!(calendar.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_events_unparseable_time() {
        let calendar = FakeCalendar::default();
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let result = registry.call(NAME, r#"{"time_min": "next tuesday"}"#).await;
        assert!(result.is_error());
        assert!(calendar.calls().is_empty());
    }
}
