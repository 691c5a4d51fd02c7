//! Integration tests for bearer token checks on agent routes

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{AGENT_SECRET, body_json, test_app, test_config, with_secret};

    fn events_request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/events");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    /// Tests a missing Authorization header is rejected with 401
    #[tokio::test]
    async fn it_returns_401_without_header() {
        let app = test_app(with_secret(test_config()));

        let response = app.oneshot(events_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing Authorization header");
    }

    /// Tests a wrong secret or scheme is rejected with 403
    #[tokio::test]
    async fn it_returns_403_for_wrong_secret() {
        for value in ["Bearer nope", "Basic test-secret", "test-secret"] {
            let app = test_app(with_secret(test_config()));
            let response = app.oneshot(events_request(Some(value))).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{}", value);
        }
    }

    /// Tests the right secret gets past auth. The calendar isn't
    /// configured so the request then fails with 503.
    #[tokio::test]
    async fn it_accepts_the_configured_secret() {
        let app = test_app(with_secret(test_config()));
        let value = format!("Bearer {}", AGENT_SECRET);

        let response = app.oneshot(events_request(Some(&value))).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Google Calendar credentials not configured");
    }

    /// Tests requests are let through when no secret is configured
    #[tokio::test]
    async fn it_allows_requests_without_a_secret() {
        let app = test_app(test_config());

        let response = app.oneshot(events_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
