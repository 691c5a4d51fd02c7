pub mod gcal;
pub use gcal::GoogleCalendar;
pub mod oauth;
