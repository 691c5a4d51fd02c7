//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::Arc;

use axum::{Router, body::Body, response::Response};
use chrono_tz::Tz;
use serde_json::Value;

use planner::api::AppState;
use planner::api::app;
use planner::core::AppConfig;

pub const AGENT_SECRET: &str = "test-secret";

/// Config with nothing configured. Tests opt into the backends they
/// need with `with_google` and `with_openai`.
pub fn test_config() -> AppConfig {
    AppConfig {
        openai_api_hostname: String::from("http://localhost:1"),
        openai_api_key: None,
        openai_model: String::from("gpt-4o-mini"),
        google_client_id: None,
        google_client_secret: None,
        google_refresh_token: None,
        google_api_base_url: String::from("http://localhost:1/calendar/v3"),
        google_token_url: String::from("http://localhost:1/token"),
        calendar_id: String::from("primary"),
        time_zone: Tz::UTC,
        agent_secret: None,
        system_message: String::from("You are a helpful assistant."),
    }
}

/// Point the Google Calendar client at a mock server.
pub fn with_google(config: AppConfig, server_url: &str) -> AppConfig {
    AppConfig {
        google_client_id: Some(String::from("test_client_id")),
        google_client_secret: Some(String::from("test_client_secret")),
        google_refresh_token: Some(String::from("test_refresh_token")),
        google_api_base_url: format!("{}/calendar/v3", server_url),
        google_token_url: format!("{}/token", server_url),
        ..config
    }
}

/// Point the model client at a mock server.
pub fn with_openai(config: AppConfig, server_url: &str) -> AppConfig {
    AppConfig {
        openai_api_hostname: server_url.to_string(),
        openai_api_key: Some(String::from("test-api-key")),
        ..config
    }
}

pub fn with_secret(config: AppConfig) -> AppConfig {
    AppConfig {
        agent_secret: Some(String::from(AGENT_SECRET)),
        ..config
    }
}

/// Creates a test application router from `config`.
pub fn test_app(config: AppConfig) -> Router {
    app(Arc::new(AppState::new(config)))
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Mock the token exchange used before every calendar call.
pub async fn mock_token(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "test-access-token", "expires_in": 3599, "token_type": "Bearer"}"#)
        .create_async()
        .await
}

pub fn chat_response(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn tool_call_response(name: &str, arguments: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-2",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": name, "arguments": arguments}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
    .to_string()
}
