//! Reusable prompts using Handlebars for templating. Handlebars adds
//! additional security controls since it can't do much out of the box
//! without registering your own helpers. This is ideal since calendar
//! content and user supplied tasks should be considered untrusted.
//! Output goes to a model, not a browser, so HTML escaping is off.

use std::fmt;

use handlebars::Handlebars;
use serde_json::json;

use crate::core::error::PlannerError;

#[derive(Debug)]
pub enum Prompt {
    Scheduling,
    DayPlan,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

const SCHEDULING_PROMPT: &str = r"{{persona}}

The current time is {{now}} and the user's time zone is {{time_zone}}.

Use the calendar tools when the request needs the user's calendar. Dates are YYYY-MM-DD, date-times are ISO 8601. Times without an offset are interpreted in {{time_zone}}.

Deleting or updating an event requires its event_id from list_events. Never guess which event the user means. If more than one event could match, list the candidates and ask the user to choose before changing anything.
";

const DAY_PLAN_PROMPT: &str = r"You are an organizational assistant. Today is {{date}}.

Events on my calendar for today:
{{#each events}}
- {{start}} to {{end}}: {{summary}}
{{else}}
No events.
{{/each}}
{{#if tasks}}

Pending tasks:
{{#each tasks}}
- {{this}}
{{/each}}
{{/if}}

Based on this, propose an optimized plan for the day with time blocks, priorities and a suggestion of what to postpone if necessary. Be practical and reply in JSON with the fields: morning, afternoon, evening, notes.

Reply with JSON only.
";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::Scheduling.to_string(), SCHEDULING_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::DayPlan.to_string(), DAY_PLAN_PROMPT)
        .expect("Failed to register template");
    registry
}

fn render(prompt: Prompt, data: &serde_json::Value) -> Result<String, PlannerError> {
    templates()
        .render(&prompt.to_string(), data)
        .map_err(|e| PlannerError::Internal(e.into()))
}

/// System instruction for the orchestration loop.
pub fn scheduling_prompt(persona: &str, now: &str, time_zone: &str) -> Result<String, PlannerError> {
    render(
        Prompt::Scheduling,
        &json!({"persona": persona, "now": now, "time_zone": time_zone}),
    )
}

#[derive(serde::Serialize)]
pub struct PlanEvent {
    pub start: String,
    pub end: String,
    pub summary: String,
}

pub fn day_plan_prompt(
    date: &str,
    events: &[PlanEvent],
    tasks: &[String],
) -> Result<String, PlannerError> {
    render(
        Prompt::DayPlan,
        &json!({"date": date, "events": events, "tasks": tasks}),
    )
}
