use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::core::error::PlannerError;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "tool")]
    Tool,
}

// Object {
//     "content": Null,
//     "refusal": Null,
//     "role": String("assistant"),
//     "tool_calls": Array [
//         Object {
//             "function": Object {
//                 "arguments": String("{\"max_results\":10}"),
//                 "name": String("list_events")
//             },
//             "id": String("call_KCg5V0N5E7hHHrUwdefHBfgL"),
//             "type": String("function")
//         }
//     ]
// }
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FunctionCallFn {
    #[serde(default)]
    pub arguments: String,
    pub name: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FunctionCall {
    pub function: FunctionCallFn,
    // Some OpenAI compatible servers leave these out
    #[serde(default)]
    pub id: String,
    #[serde(default = "function_type")]
    pub r#type: String,
}

fn function_type() -> String {
    String::from("function")
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    refusal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<FunctionCall>>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            refusal: None,
            content: Some(content.to_string()),
            tool_call_id: None,
            tool_calls: None,
        }
    }
    pub fn new_tool_call_request(tool_calls: Vec<FunctionCall>) -> Self {
        Message {
            role: Role::Assistant,
            refusal: None,
            content: None,
            tool_call_id: None,
            tool_calls: Some(tool_calls),
        }
    }
    pub fn new_tool_call_response(content: &str, tool_call_id: &str) -> Self {
        Message {
            role: Role::Tool,
            refusal: None,
            content: Some(content.to_string()),
            tool_call_id: Some(tool_call_id.to_string()),
            tool_calls: None,
        }
    }
}

#[cfg(test)]
impl Message {
    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn tool_calls(&self) -> &[FunctionCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct Property {
    pub r#type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Property {
    pub fn new(r#type: &str, description: &str) -> Self {
        Self {
            r#type: r#type.to_string(),
            description: description.to_string(),
            items: None,
            default: None,
        }
    }

    pub fn array_of(item_type: &str, description: &str) -> Self {
        Self {
            items: Some(json!({"type": item_type})),
            ..Self::new("array", description)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Serialize)]
pub struct Parameters<Props: Serialize> {
    pub r#type: String,
    pub properties: Props,
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

#[derive(Serialize)]
pub struct Function<Props: Serialize> {
    pub name: String,
    pub description: String,
    pub parameters: Parameters<Props>,
    pub strict: bool,
}

#[derive(Serialize)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

/// A tool declaration in the shape the chat completions API expects.
#[derive(Serialize)]
pub struct ToolDefinition<Props: Serialize> {
    pub r#type: ToolType,
    pub function: Function<Props>,
}

#[cfg(test)]
impl<Props: Serialize> ToolDefinition<Props> {
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// The first choice of a chat completion response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: Option<String>,
    pub tool_calls: Vec<FunctionCall>,
}

impl Reply {
    pub fn from_response(resp: &Value) -> Result<Self, PlannerError> {
        let message = &resp["choices"][0]["message"];
        if message.is_null() {
            return Err(PlannerError::UpstreamModel(format!(
                "No message received. Resp:\n\n {}",
                resp
            )));
        }

        let content = message["content"].as_str().map(String::from);
        let tool_calls = match message["tool_calls"].as_array() {
            Some(calls) => calls
                .iter()
                .map(|call| {
                    serde_json::from_value::<FunctionCall>(call.clone()).map_err(|e| {
                        PlannerError::UpstreamModel(format!("Invalid tool call {}: {}", call, e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let tool_calls = tool_calls
            .into_iter()
            .map(|mut call| {
                if call.id.is_empty() {
                    call.id = format!("call_{}", Uuid::new_v4().simple());
                }
                call
            })
            .collect();

        Ok(Self {
            content,
            tool_calls,
        })
    }
}

pub async fn completion(
    messages: &[Message],
    tools: &[Value],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Value, PlannerError> {
    let mut payload = json!({
        "model": model,
        "messages": messages,
    });
    if !tools.is_empty() {
        payload["tools"] = json!(tools);
    }
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 2))
        .json(&payload)
        .send()
        .await
        .map_err(|e| PlannerError::UpstreamModel(e.to_string()))?;

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(PlannerError::UpstreamModel(format!("{} ({})", status, text)));
    }

    serde_json::from_str(&text)
        .map_err(|e| PlannerError::UpstreamModel(format!("Invalid completion response: {}", e)))
}
