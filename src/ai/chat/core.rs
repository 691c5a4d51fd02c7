use serde_json::Value;

use super::models::{ChatOutcome, Transcript};
use crate::ai::tools::{CalendarOperation, ToolRegistry, ToolResult};
use crate::core::error::PlannerError;
use crate::openai::{Message, Reply, Role, completion};

/// The core abstraction around interacting with an LLM in a chat
/// completion style using an OpenAI compatible API.
///
/// A run is bounded: the model is asked at most twice and at most one
/// calendar operation is executed in between. If the model asks for a
/// tool again on the second pass, that request is ignored and its text
/// is returned as is.
///
/// Use `Chat::builder()` to construct a valid `Chat`.
pub struct Chat {
    api_hostname: String,
    api_key: String,
    model: String,
    system_message: Option<String>,
    transcript: Transcript,
}

impl Chat {
    pub fn builder(api_hostname: &str, api_key: &str, model: &str) -> ChatBuilder {
        ChatBuilder::new(api_hostname, api_key, model)
    }

    fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        if let Some(system) = &self.system_message {
            messages.push(Message::new(Role::System, system));
        }
        messages.extend(self.transcript.messages().iter().cloned());
        messages
    }

    async fn complete(&self, tools: &[Value]) -> Result<Reply, PlannerError> {
        let resp = completion(
            &self.messages(),
            tools,
            &self.api_hostname,
            &self.api_key,
            &self.model,
        )
        .await?;
        Reply::from_response(&resp)
    }

    /// Run the exchange to completion against the calendar behind
    /// `registry`. Provider failures are returned as errors. Failures
    /// inside the tool are handed back to the model to explain.
    pub async fn run(mut self, registry: &ToolRegistry<'_>) -> Result<ChatOutcome, PlannerError> {
        let tools = registry.definitions();
        let reply = self.complete(&tools).await?;

        let Some(call) = reply.tool_calls.first().cloned() else {
            return Ok(ChatOutcome {
                answer: reply.content.unwrap_or_default(),
                operation: None,
            });
        };
        if reply.tool_calls.len() > 1 {
            tracing::warn!(
                "Model requested {} tool calls, only running {}",
                reply.tool_calls.len(),
                call.function.name
            );
        }

        tracing::debug!(
            "\nTool call: {}\nargs: {}",
            &call.function.name,
            &call.function.arguments
        );
        let (result, operation) =
            match CalendarOperation::from_call(&call.function.name, &call.function.arguments) {
                Ok(op) => (registry.execute(&op).await, Some(op.name().to_string())),
                Err(failure) => {
                    tracing::warn!("Rejected tool call {}: {}", call.function.name, failure.error);
                    (ToolResult::Error(failure), None)
                }
            };

        // The model only sees the call that actually ran
        self.transcript
            .push(Message::new_tool_call_request(vec![call.clone()]));
        self.transcript
            .push(Message::new_tool_call_response(&result.to_content(), &call.id));

        let reply = self.complete(&tools).await?;
        if !reply.tool_calls.is_empty() {
            tracing::warn!(
                "Ignoring {} tool calls requested after {}",
                reply.tool_calls.len(),
                call.function.name
            );
        }
        let answer = reply.content.unwrap_or_else(|| {
            tracing::warn!("Model returned no content after a tool call");
            String::new()
        });

        Ok(ChatOutcome { answer, operation })
    }
}

#[derive(Default)]
pub struct ChatBuilder {
    api_hostname: String,
    api_key: String,
    model: String,
    system_message: Option<String>,
    transcript: Transcript,
}

impl ChatBuilder {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_message: None,
            transcript: Transcript::new(),
        }
    }

    pub fn build(self) -> Chat {
        Chat {
            api_hostname: self.api_hostname,
            api_key: self.api_key,
            model: self.model,
            system_message: self.system_message,
            transcript: self.transcript,
        }
    }

    pub fn system_message(mut self, message: &str) -> Self {
        self.system_message = Some(message.to_string());
        self
    }

    pub fn transcript(mut self, messages: Vec<Message>) -> Self {
        self.transcript = Transcript::new_with_messages(messages);
        self
    }
}
