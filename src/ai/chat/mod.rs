mod core;
pub use self::core::{Chat, ChatBuilder};

pub mod history;
pub use history::normalize_history;

pub mod models;
pub use models::ChatOutcome;
