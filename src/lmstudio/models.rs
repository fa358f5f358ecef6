//! Request and response payloads for the `/v1` endpoints the bridge uses.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation.
    System,
    /// End-user turn.
    User,
    /// Model turn.
    Assistant,
}

/// A single `{role, content}` entry of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: Role,
    /// Message text. LM Studio may send `null` for empty assistant turns.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl ChatMessage {
    /// Build a `system` message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a `user` message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier; LM Studio routes any value to the loaded model.
    pub model: String,
    /// Ordered conversation.
    pub messages: Vec<ChatMessage>,
}

/// One completion alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Generated message.
    pub message: ChatMessage,
}

/// Token accounting returned with a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Tokens generated.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Sum of both.
    #[serde(default)]
    pub total_tokens: u64,
}

/// Response of `POST /v1/chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Identifier of the model that served the request.
    #[serde(default)]
    pub model: String,
    /// Completion alternatives, first one is used.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token counters, absent on some server builds.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any.
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content.as_str())
    }
}

/// An entry of `GET /v1/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Object type, normally `model`.
    #[serde(default)]
    pub object: Option<String>,
    /// Creation timestamp (seconds since epoch).
    #[serde(default)]
    pub created: Option<i64>,
    /// Owning organization.
    #[serde(default)]
    pub owned_by: Option<String>,
}

/// Response of `GET /v1/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    /// Available models in server order.
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}
