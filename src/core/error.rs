//! Error taxonomy shared by the API, the orchestration loop and the
//! calendar gateway.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    /// Required credentials or backend settings are absent.
    #[error("{0} not configured")]
    Configuration(String),

    #[error("Missing Authorization header")]
    MissingCredential,

    #[error("Invalid or missing agent secret")]
    InvalidCredential,

    #[error("{0}")]
    Validation(String),

    /// The calendar backend failed or returned something unusable.
    #[error("Calendar request failed: {0}")]
    UpstreamApi(String),

    /// The language model provider failed or returned something unusable.
    #[error("Model request failed: {0}")]
    UpstreamModel(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlannerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
