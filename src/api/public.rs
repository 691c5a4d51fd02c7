//! Public API types

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::core::error::PlannerError;

// Errors

#[derive(Debug)]
pub struct ApiError(PlannerError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PlannerError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            PlannerError::MissingCredential => StatusCode::UNAUTHORIZED,
            PlannerError::InvalidCredential => StatusCode::FORBIDDEN,
            PlannerError::Validation(_) => StatusCode::BAD_REQUEST,
            PlannerError::UpstreamApi(_) | PlannerError::UpstreamModel(_) => StatusCode::BAD_GATEWAY,
            PlannerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        (self.status(), Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

/// Enables using `?` on anything that converts into a `PlannerError`,
/// including `anyhow::Error`.
impl<E> From<E> for ApiError
where
    E: Into<PlannerError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// JSON request body. Any body axum rejects becomes a validation error
/// with the usual `{"error"}` response.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                PlannerError::validation(format!("Invalid request body: {}", rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}

// Re-export public types from each route

pub mod agent {
    pub use crate::api::routes::agent::public::*;
}

pub mod ask {
    pub use crate::api::routes::ask::public::*;
}

pub mod events {
    pub use crate::api::routes::events::public::*;
}

pub mod plan {
    pub use crate::api::routes::plan::public::*;
}

pub mod suggest {
    pub use crate::api::routes::suggest::public::*;
}
