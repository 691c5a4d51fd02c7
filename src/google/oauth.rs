//! Exchange a stored OAuth refresh token for a short lived access
//! token.

use reqwest::Client;
use serde::Deserialize;

use crate::core::error::PlannerError;

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

pub async fn refresh_access_token(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<AccessToken, PlannerError> {
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];
    let res = Client::new()
        .post(token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| PlannerError::UpstreamApi(format!("token refresh failed: {}", e)))?;

    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(PlannerError::UpstreamApi(format!(
            "token refresh failed: {} ({})",
            status, text
        )));
    }

    serde_json::from_str(&text)
        .map_err(|e| PlannerError::UpstreamApi(format!("invalid token response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_access_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                mockito::Matcher::UrlEncoded("refresh_token".into(), "refresh-123".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"ya29.token","expires_in":3599,"token_type":"Bearer"}"#)
            .create_async()
            .await;

        let url = format!("{}/token", server.url());
        let token = refresh_access_token(&url, "client", "secret", "refresh-123")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(token.access_token, "ya29.token");
        assert_eq!(token.expires_in, Some(3599));
    }

    #[tokio::test]
    async fn test_refresh_access_token_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let url = format!("{}/token", server.url());
        let result = refresh_access_token(&url, "client", "secret", "expired").await;

        match result {
            Err(PlannerError::UpstreamApi(msg)) => assert!(msg.contains("invalid_grant")),
            other => panic!("Expected upstream error, got {:?}", other),
        }
    }
}
