//! `lmstudio_chat_completion` tool: one-shot prompt against the loaded model.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, info_span, Instrument};

use super::util::{failure, parse_args, LOADED_MODEL_HINT};
use crate::lmstudio::models::{ChatCompletionResponse, ChatMessage};
use crate::lmstudio::LmStudioClient;
use crate::mcp::registry::{Arguments, ParamKind, ParamSpec, ToolDefinition, ToolOutput};
use crate::Result;

/// Registered tool name.
pub const NAME: &str = "lmstudio_chat_completion";

/// Validated input.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionInput {
    /// User prompt.
    pub prompt: String,
    /// Optional system message placed before the prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl ChatCompletionInput {
    /// Conversation forwarded to LM Studio: `[system?, user]`.
    ///
    /// An empty system prompt is treated as absent.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(self.prompt.as_str()));
        messages
    }
}

/// Tool definition advertised through `tools/list`.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        NAME,
        "LM Studio Chat Completion",
        "Send a prompt to the model loaded in LM Studio and return its reply.",
    )
    .param(
        ParamSpec::required("prompt", ParamKind::String)
            .describe("The prompt to send to the model"),
    )
    .param(
        ParamSpec::optional("system_prompt", ParamKind::String)
            .describe("Optional system prompt placed before the user prompt"),
    )
}

/// Handle the `lmstudio_chat_completion` tool call.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if the arguments do not decode;
/// forwarder failures become failure output.
pub async fn handle(client: Arc<LmStudioClient>, args: Arguments) -> Result<ToolOutput> {
    let input: ChatCompletionInput = parse_args(NAME, args)?;
    let span = info_span!(
        "lmstudio_chat_completion",
        prompt_len = input.prompt.len(),
        has_system_prompt = input.system_prompt.is_some(),
    );

    async move {
        match client.chat_completion(input.messages()).await {
            Ok(resp) => {
                let usage = resp.usage.unwrap_or_default();
                info!(
                    model = %resp.model,
                    total_tokens = usage.total_tokens,
                    "chat completion finished"
                );
                Ok(ToolOutput::text(render(&resp)))
            }
            Err(err) => Ok(failure(
                "Error in chat completion",
                &err,
                Some(LOADED_MODEL_HINT),
            )),
        }
    }
    .instrument(span)
    .await
}

/// Model id, reply text, and token usage.
#[must_use]
pub fn render(resp: &ChatCompletionResponse) -> String {
    let usage = resp.usage.unwrap_or_default();
    format!(
        "Model: {}\n\nResponse:\n{}\n\nUsage: {} prompt tokens, {} completion tokens, {} total tokens",
        resp.model,
        resp.first_content().unwrap_or("(no response)"),
        usage.prompt_tokens,
        usage.completion_tokens,
        usage.total_tokens,
    )
}
