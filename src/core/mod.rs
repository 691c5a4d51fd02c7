mod config;
pub use config::{AppConfig, OpenAiSettings};
pub mod error;
pub use error::PlannerError;
pub mod time;
