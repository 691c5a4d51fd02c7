use std::env;

use chrono_tz::Tz;

use super::error::PlannerError;

const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are a practical scheduling assistant that manages the user's calendar.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_refresh_token: Option<String>,
    pub google_api_base_url: String,
    pub google_token_url: String,
    pub calendar_id: String,
    pub time_zone: Tz,
    pub agent_secret: Option<String>,
    pub system_message: String,
}

/// Everything needed to call the language model provider.
#[derive(Clone, Debug)]
pub struct OpenAiSettings {
    pub api_hostname: String,
    pub api_key: String,
    pub model: String,
}

impl AppConfig {
    pub fn openai_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn calendar_configured(&self) -> bool {
        self.google_client_id.is_some()
            && self.google_client_secret.is_some()
            && self.google_refresh_token.is_some()
    }

    /// Settings for the model provider or a configuration error when
    /// no API key was provided.
    pub fn openai(&self) -> Result<OpenAiSettings, PlannerError> {
        let api_key = self
            .openai_api_key
            .clone()
            .ok_or_else(|| PlannerError::Configuration(String::from("OPENAI_API_KEY")))?;

        Ok(OpenAiSettings {
            api_hostname: self.openai_api_hostname.clone(),
            api_key,
            model: self.openai_model.clone(),
        })
    }
}

// Empty strings count as unset so a blank line in an env file
// doesn't look like a credential
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_time_zone(name: Option<String>) -> Tz {
    name.and_then(|n| n.parse::<Tz>().ok()).unwrap_or(Tz::UTC)
}

impl Default for AppConfig {
    fn default() -> Self {
        let openai_api_hostname = env::var("PLANNER_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key = non_empty_var("OPENAI_API_KEY");
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let google_client_id = non_empty_var("GOOGLE_CLIENT_ID");
        let google_client_secret = non_empty_var("GOOGLE_CLIENT_SECRET");
        let google_refresh_token = non_empty_var("GOOGLE_REFRESH_TOKEN");
        let google_api_base_url = env::var("PLANNER_GOOGLE_API_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string());
        let google_token_url = env::var("PLANNER_GOOGLE_TOKEN_URL")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());
        let calendar_id = non_empty_var("CALENDAR_ID").unwrap_or_else(|| "primary".to_string());
        let time_zone = parse_time_zone(non_empty_var("PLANNER_TIME_ZONE"));
        let agent_secret = non_empty_var("AGENT_SECRET");
        let system_message = env::var("PLANNER_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_MESSAGE.to_string());

        Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            google_client_id,
            google_client_secret,
            google_refresh_token,
            google_api_base_url,
            google_token_url,
            calendar_id,
            time_zone,
            agent_secret,
            system_message,
        }
    }
}
