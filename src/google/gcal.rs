//! Google Calendar v3 REST client implementing `CalendarGateway`.

use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use super::oauth::refresh_access_token;
use crate::calendar::{
    CalendarEvent, CalendarGateway, EventPatch, EventTime, NewEvent, TimeRange,
};
use crate::core::AppConfig;
use crate::core::error::PlannerError;
use crate::core::time::{self, format_utc};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    id: String,
    summary: Option<String>,
    start: Option<GoogleEventTime>,
    end: Option<GoogleEventTime>,
    status: Option<String>,
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListEventsResponse {
    items: Option<Vec<GoogleEvent>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTimeBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Debug, Serialize)]
struct AttendeeBody {
    email: String,
}

#[derive(Debug, Serialize)]
struct EventBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<EventTimeBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<EventTimeBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<AttendeeBody>,
}

/// A request scoped handle on one calendar. The access token is
/// fetched on the first call and reused for the rest of the request.
pub struct GoogleCalendar {
    client: Client,
    api_base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    calendar_id: String,
    time_zone: Tz,
    access_token: OnceCell<String>,
}

impl GoogleCalendar {
    /// Checks that every credential is present without touching the
    /// network.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlannerError> {
        let (Some(client_id), Some(client_secret), Some(refresh_token)) = (
            &config.google_client_id,
            &config.google_client_secret,
            &config.google_refresh_token,
        ) else {
            return Err(PlannerError::Configuration(String::from(
                "Google Calendar credentials",
            )));
        };

        Ok(Self {
            client: Client::new(),
            api_base_url: config.google_api_base_url.clone(),
            token_url: config.google_token_url.clone(),
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
            refresh_token: refresh_token.clone(),
            calendar_id: config.calendar_id.clone(),
            time_zone: config.time_zone,
            access_token: OnceCell::new(),
        })
    }

    async fn access_token(&self) -> Result<&str, PlannerError> {
        let token = self
            .access_token
            .get_or_try_init(|| async {
                refresh_access_token(
                    &self.token_url,
                    &self.client_id,
                    &self.client_secret,
                    &self.refresh_token,
                )
                .await
                .map(|t| t.access_token)
            })
            .await?;
        Ok(token.as_str())
    }

    /// `{base}/calendars/{calendar_id}/events[/{event_id}]` with each
    /// segment percent encoded.
    fn events_url(&self, event_id: Option<&str>) -> Result<Url, PlannerError> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            PlannerError::Configuration(format!("Calendar API URL ({})", e))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                PlannerError::Configuration(String::from("Calendar API URL"))
            })?;
            segments
                .pop_if_empty()
                .extend(["calendars", self.calendar_id.as_str(), "events"]);
            if let Some(id) = event_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn event_time_body(&self, time: &EventTime) -> EventTimeBody {
        match time {
            EventTime::At(dt) => EventTimeBody {
                date_time: Some(dt.with_timezone(&self.time_zone).to_rfc3339()),
                date: None,
                time_zone: Some(self.time_zone.name().to_string()),
            },
            EventTime::Date(date) => EventTimeBody {
                date_time: None,
                date: Some(date.format("%Y-%m-%d").to_string()),
                time_zone: None,
            },
        }
    }

    fn to_calendar_event(&self, event: GoogleEvent) -> Option<CalendarEvent> {
        let start = self.parse_event_time(event.start.as_ref());
        let end = self.parse_event_time(event.end.as_ref());
        let (Some(start), Some(end)) = (start, end) else {
            tracing::warn!("Skipping event {} with unreadable start/end", event.id);
            return None;
        };

        Some(CalendarEvent {
            id: event.id,
            summary: event.summary,
            start,
            end,
            status: event.status,
            html_link: event.html_link,
        })
    }

    fn parse_event_time(&self, value: Option<&GoogleEventTime>) -> Option<time::Instant> {
        let value = value?;
        let raw = value.date_time.as_deref().or(value.date.as_deref())?;
        time::parse(raw, &self.time_zone).ok()
    }
}

async fn read_body(res: Response, action: &str) -> Result<String, PlannerError> {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(PlannerError::UpstreamApi(format!(
            "{} failed: {} ({})",
            action, status, text
        )));
    }
    Ok(text)
}

fn request_failed(action: &str, err: reqwest::Error) -> PlannerError {
    PlannerError::UpstreamApi(format!("{} failed: {}", action, err))
}

#[async_trait]
impl CalendarGateway for GoogleCalendar {
    async fn list_events(
        &self,
        range: &TimeRange,
        max_results: u32,
    ) -> Result<Vec<CalendarEvent>, PlannerError> {
        let mut url = self.events_url(None)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("timeMin", &format_utc(&range.min));
            if let Some(max) = &range.max {
                query.append_pair("timeMax", &format_utc(max));
            }
            query
                .append_pair("maxResults", &max_results.to_string())
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime");
        }

        tracing::debug!("Listing events: {}", url);
        let token = self.access_token().await?;
        let res = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_failed("List events", e))?;
        let text = read_body(res, "List events").await?;
        let resp: ListEventsResponse = serde_json::from_str(&text)
            .map_err(|e| PlannerError::UpstreamApi(format!("invalid events response: {}", e)))?;

        Ok(resp
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|e| self.to_calendar_event(e))
            .collect())
    }

    async fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent, PlannerError> {
        let body = EventBody {
            summary: Some(event.summary.clone()),
            description: Some(event.description.clone().unwrap_or_default()),
            start: Some(self.event_time_body(&event.start)),
            end: Some(self.event_time_body(&event.end)),
            attendees: event
                .attendees
                .iter()
                .map(|email| AttendeeBody {
                    email: email.clone(),
                })
                .collect(),
        };

        let url = self.events_url(None)?;
        tracing::debug!("Creating event '{}'", event.summary);
        let token = self.access_token().await?;
        let res = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failed("Create event", e))?;
        let text = read_body(res, "Create event").await?;
        let created: GoogleEvent = serde_json::from_str(&text)
            .map_err(|e| PlannerError::UpstreamApi(format!("invalid event response: {}", e)))?;

        self.to_calendar_event(created).ok_or_else(|| {
            PlannerError::UpstreamApi(String::from("created event is missing start/end"))
        })
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), PlannerError> {
        let url = self.events_url(Some(event_id))?;
        tracing::debug!("Deleting event {}", event_id);
        let token = self.access_token().await?;
        let res = self
            .client
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_failed("Delete event", e))?;
        read_body(res, "Delete event").await?;
        Ok(())
    }

    async fn update_event(
        &self,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<CalendarEvent, PlannerError> {
        let body = EventBody {
            summary: patch.summary.clone(),
            description: patch.description.clone(),
            start: patch.start.as_ref().map(|t| self.event_time_body(t)),
            end: patch.end.as_ref().map(|t| self.event_time_body(t)),
            attendees: Vec::new(),
        };

        let url = self.events_url(Some(event_id))?;
        tracing::debug!("Updating event {}", event_id);
        let token = self.access_token().await?;
        let res = self
            .client
            .patch(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_failed("Update event", e))?;
        let text = read_body(res, "Update event").await?;
        let updated: GoogleEvent = serde_json::from_str(&text)
            .map_err(|e| PlannerError::UpstreamApi(format!("invalid event response: {}", e)))?;

        self.to_calendar_event(updated).ok_or_else(|| {
            PlannerError::UpstreamApi(String::from("updated event is missing start/end"))
        })
    }
}
