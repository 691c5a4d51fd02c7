pub mod chat;
pub mod prompt;
pub mod slots;
pub mod tools;
