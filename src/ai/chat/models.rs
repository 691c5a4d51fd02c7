//! The core models for a single orchestrated exchange with an LLM.
use serde::Serialize;

use crate::openai::Message;

#[derive(Default)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn new_with_messages(messages: Vec<Message>) -> Self {
        Self(messages)
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn push(&mut self, msg: Message) {
        self.0.push(msg)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a run of the chat produced: the final answer and the name of
/// the calendar operation that ran, if any.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatOutcome {
    pub answer: String,
    pub operation: Option<String>,
}
