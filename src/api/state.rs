use std::sync::Arc;

use crate::core::AppConfig;

/// Read-only state shared by every request. Clients for the calendar
/// and the model are built per request from `config`.
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

pub type SharedState = Arc<AppState>;
