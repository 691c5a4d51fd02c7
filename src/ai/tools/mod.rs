//! Calendar operations the model can call. Every operation is a
//! variant of `CalendarOperation` and dispatch is an exhaustive match,
//! so adding an operation without wiring it up fails to compile.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::calendar::{CalendarGateway, EventSummary, TimeRange};
use crate::core::error::PlannerError;
use crate::core::time::{self, Instant};

pub mod create_event;
pub mod delete_event;
pub mod find_free_slot;
pub mod list_events;
pub mod update_event;

use create_event::CreateEventArgs;
use delete_event::DeleteEventArgs;
use find_free_slot::FindFreeSlotArgs;
use list_events::ListEventsArgs;
use update_event::UpdateEventArgs;

/// How many upcoming events are offered as candidates when the model
/// asks to change an event without naming its id.
const CANDIDATE_LIMIT: usize = 10;

/// How many upcoming events are searched for candidates. Matching
/// happens before truncating to `CANDIDATE_LIMIT`.
const CANDIDATE_SEARCH_MAX_RESULTS: u32 = 250;

/// Payload returned to the model when an operation can't be carried
/// out. `candidates` is only set when the target event is ambiguous.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ToolFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<EventSummary>,
}

impl ToolFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            candidates: Vec::new(),
        }
    }
}

impl From<PlannerError> for ToolFailure {
    fn from(err: PlannerError) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ToolResult {
    Success(Value),
    Error(ToolFailure),
}

impl ToolResult {
    #[cfg(test)]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Serialized form sent back to the model as the tool message.
    pub fn to_content(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| json!({"error": format!("Failed to encode result: {}", e)}).to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CalendarOperation {
    ListEvents(ListEventsArgs),
    CreateEvent(CreateEventArgs),
    DeleteEvent(DeleteEventArgs),
    UpdateEvent(UpdateEventArgs),
    FindFreeSlot(FindFreeSlotArgs),
}

fn parse_args<T: DeserializeOwned>(name: &str, arguments: &str) -> Result<T, ToolFailure> {
    // Some providers send an empty string for calls without arguments
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(arguments)
        .map_err(|e| ToolFailure::new(format!("Invalid arguments for {}: {}", name, e)))
}

impl CalendarOperation {
    /// Parse a tool call into an operation. Unknown names and
    /// arguments that don't decode are reported as failures rather than
    /// errors so the model can see what went wrong.
    pub fn from_call(name: &str, arguments: &str) -> Result<Self, ToolFailure> {
        let op = match name {
            list_events::NAME => Self::ListEvents(parse_args(name, arguments)?),
            create_event::NAME => Self::CreateEvent(parse_args(name, arguments)?),
            delete_event::NAME => Self::DeleteEvent(parse_args(name, arguments)?),
            update_event::NAME => Self::UpdateEvent(parse_args(name, arguments)?),
            find_free_slot::NAME => Self::FindFreeSlot(parse_args(name, arguments)?),
            other => return Err(ToolFailure::new(format!("Unknown tool: {}", other))),
        };
        Ok(op)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListEvents(_) => list_events::NAME,
            Self::CreateEvent(_) => create_event::NAME,
            Self::DeleteEvent(_) => delete_event::NAME,
            Self::UpdateEvent(_) => update_event::NAME,
            Self::FindFreeSlot(_) => find_free_slot::NAME,
        }
    }
}

/// Everything an operation needs to run: the calendar plus the clock
/// and zone used to interpret relative input. Built per request.
pub struct ToolRegistry<'a> {
    gateway: &'a dyn CalendarGateway,
    time_zone: Tz,
    now: DateTime<Utc>,
}

impl<'a> ToolRegistry<'a> {
    pub fn new(gateway: &'a dyn CalendarGateway, time_zone: Tz, now: DateTime<Utc>) -> Self {
        Self {
            gateway,
            time_zone,
            now,
        }
    }

    pub fn gateway(&self) -> &'a dyn CalendarGateway {
        self.gateway
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Tool declarations in the order they are offered to the model.
    pub fn definitions(&self) -> Vec<Value> {
        vec![
            json!(list_events::definition()),
            json!(create_event::definition()),
            json!(delete_event::definition()),
            json!(update_event::definition()),
            json!(find_free_slot::definition()),
        ]
    }

    pub fn parse_time(&self, text: &str) -> Result<Instant, PlannerError> {
        time::parse(text, &self.time_zone)
    }

    /// Run a tool call by name. Never fails: problems are returned as
    /// an error payload for the model.
    #[cfg(test)]
    pub async fn call(&self, name: &str, arguments: &str) -> ToolResult {
        match CalendarOperation::from_call(name, arguments) {
            Ok(op) => self.execute(&op).await,
            Err(failure) => {
                tracing::warn!("Rejected tool call {}: {}", name, failure.error);
                ToolResult::Error(failure)
            }
        }
    }

    pub async fn execute(&self, op: &CalendarOperation) -> ToolResult {
        tracing::debug!("Executing {}", op.name());
        let result = match op {
            CalendarOperation::ListEvents(args) => list_events::run(self, args).await,
            CalendarOperation::CreateEvent(args) => create_event::run(self, args).await,
            CalendarOperation::DeleteEvent(args) => delete_event::run(self, args).await,
            CalendarOperation::UpdateEvent(args) => update_event::run(self, args).await,
            CalendarOperation::FindFreeSlot(args) => find_free_slot::run(self, args).await,
        };
        match result {
            Ok(value) => ToolResult::Success(value),
            Err(failure) => {
                tracing::warn!("{} failed: {}", op.name(), failure.error);
                ToolResult::Error(failure)
            }
        }
    }

    /// Return `event_id` when given. Otherwise never guess: look up
    /// upcoming events matching `query` and fail with them as
    /// candidates so the user can pick one.
    pub(crate) async fn resolve_event_id(
        &self,
        event_id: Option<&str>,
        query: Option<&str>,
        action: &str,
    ) -> Result<String, ToolFailure> {
        if let Some(id) = event_id.map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }

        let range = TimeRange {
            min: self.now,
            max: None,
        };
        let events = self
            .gateway
            .list_events(&range, CANDIDATE_SEARCH_MAX_RESULTS)
            .await?;
        let needle = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        let mut candidates: Vec<EventSummary> = events
            .iter()
            .filter(|event| match &needle {
                Some(needle) => event.summary_or_default().to_lowercase().contains(needle),
                None => true,
            })
            .map(EventSummary::from)
            .collect();
        let matched = candidates.len();
        candidates.truncate(CANDIDATE_LIMIT);

        let error = match matched {
            0 => format!(
                "event_id is required to {} an event and no upcoming event matches. Call list_events to find it.",
                action
            ),
            1 => format!(
                "event_id is required to {} an event. Confirm the candidate with the user and call again with its id.",
                action
            ),
            n => format!(
                "event_id is required to {} an event. {} events match, ask the user which one they mean.",
                action, n
            ),
        };
        Err(ToolFailure { error, candidates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::testing::{FakeCalendar, timed_event};
    use chrono_tz::America::Sao_Paulo;

    pub(super) fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_definitions_match_operations() {
        let calendar = FakeCalendar::default();
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let names: Vec<String> = registry
            .definitions()
            .iter()
            .map(|d| d["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "list_events",
                "create_event",
                "delete_event",
                "update_event",
                "find_free_slot"
            ]
        );
        for definition in registry.definitions() {
            assert_eq!(definition["type"], "function");
            assert_eq!(definition["function"]["parameters"]["type"], "object");
        }
    }

    #[test]
    fn test_from_call_unknown_tool() {
        let err = CalendarOperation::from_call("send_email", "{}").unwrap_err();
        assert_eq!(err.error, "Unknown tool: send_email");
    }

    #[test]
    fn test_from_call_empty_arguments() {
        let op = CalendarOperation::from_call("list_events", "").unwrap();
        assert_eq!(op.name(), "list_events");
    }

    #[test]
    fn test_from_call_malformed_arguments() {
        let err = CalendarOperation::from_call("create_event", "{not json").unwrap_err();
        assert!(err.error.starts_with("Invalid arguments for create_event"));
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_error_payload() {
        let calendar = FakeCalendar::default();
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let result = registry.call("nope", "{}").await;
        assert!(result.is_error());
        assert_eq!(
            result.to_content(),
            json!({"error": "Unknown tool: nope"}).to_string()
        );
        assert!(calendar.calls().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_becomes_error_payload() {
        let calendar = FakeCalendar::failing("500 Internal Server Error");
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let result = registry.call("list_events", "{}").await;
        let ToolResult::Error(failure) = result else {
            panic!("Expected an error payload");
        };
        assert!(failure.error.contains("500 Internal Server Error"));
    }

    #[tokio::test]
    async fn test_resolve_event_id_prefers_explicit_id() {
        let calendar = FakeCalendar::default();
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let id = registry
            .resolve_event_id(Some("evt1"), Some("anything"), "delete")
            .await
            .unwrap();
        assert_eq!(id, "evt1");
        assert!(calendar.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_event_id_filters_candidates() {
        let calendar = FakeCalendar::with_events(vec![
            timed_event("a", "Dentist", "2025-01-02T09:00:00Z", "2025-01-02T10:00:00Z"),
            timed_event("b", "Team sync", "2025-01-02T11:00:00Z", "2025-01-02T12:00:00Z"),
        ]);
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());
        let failure = registry
            .resolve_event_id(None, Some("DENTIST"), "delete")
            .await
            .unwrap_err();
        assert_eq!(failure.candidates.len(), 1);
        assert_eq!(failure.candidates[0].id, "a");
        assert!(failure.error.contains("Confirm the candidate"));
    }

    #[tokio::test]
    async fn test_resolve_event_id_finds_match_past_first_page() {
        let mut events: Vec<_> = (0..12)
            .map(|i| {
                timed_event(
                    &format!("standup-{}", i),
                    "Standup",
                    &format!("2025-01-{:02}T09:00:00Z", i + 2),
                    &format!("2025-01-{:02}T09:15:00Z", i + 2),
                )
            })
            .collect();
        events.push(timed_event(
            "dentist",
            "Dentist",
            "2025-01-20T14:00:00Z",
            "2025-01-20T15:00:00Z",
        ));
        let calendar = FakeCalendar::with_events(events);
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());

        let failure = registry
            .resolve_event_id(None, Some("dentist"), "delete")
            .await
            .unwrap_err();

        assert_eq!(failure.candidates.len(), 1);
        assert_eq!(failure.candidates[0].id, "dentist");
        assert!(failure.error.contains("Confirm the candidate"));
    }

    #[tokio::test]
    async fn test_resolve_event_id_caps_candidates() {
        let events: Vec<_> = (0..12)
            .map(|i| {
                timed_event(
                    &format!("standup-{}", i),
                    "Standup",
                    &format!("2025-01-{:02}T09:00:00Z", i + 2),
                    &format!("2025-01-{:02}T09:15:00Z", i + 2),
                )
            })
            .collect();
        let calendar = FakeCalendar::with_events(events);
        let registry = ToolRegistry::new(&calendar, Sao_Paulo, now());

        let failure = registry
            .resolve_event_id(None, Some("standup"), "update")
            .await
            .unwrap_err();

        assert_eq!(failure.candidates.len(), CANDIDATE_LIMIT);
        assert!(failure.error.contains("12 events match"));
    }
}
