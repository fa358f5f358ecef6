//! `lmstudio_get_current_model` tool.
//!
//! LM Studio has no endpoint reporting the loaded model, so the tool sends a
//! fixed probe prompt to `/chat/completions` and reads the `model` field of
//! the answer.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use super::util::{failure, LOADED_MODEL_HINT};
use crate::lmstudio::models::{ChatCompletionResponse, ChatMessage};
use crate::lmstudio::LmStudioClient;
use crate::mcp::registry::{Arguments, ToolDefinition, ToolOutput};
use crate::Result;

/// Registered tool name.
pub const NAME: &str = "lmstudio_get_current_model";

/// Prompt sent to identify the loaded model.
pub const PROBE_PROMPT: &str = "What model are you?";

/// Tool definition advertised through `tools/list`.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        NAME,
        "Get Current Model",
        "Get the model currently loaded in LM Studio.",
    )
}

/// Handle the `lmstudio_get_current_model` tool call.
///
/// # Errors
///
/// Infallible in practice; forwarder failures become failure output.
pub async fn handle(client: Arc<LmStudioClient>, _args: Arguments) -> Result<ToolOutput> {
    let span = info_span!("lmstudio_get_current_model");

    async move {
        match client
            .chat_completion(vec![ChatMessage::user(PROBE_PROMPT)])
            .await
        {
            Ok(resp) => {
                info!(model = %resp.model, "probed current model");
                Ok(ToolOutput::text(render(&resp)))
            }
            Err(err) => Ok(failure(
                "Error getting current model",
                &err,
                Some(LOADED_MODEL_HINT),
            )),
        }
    }
    .instrument(span)
    .await
}

/// `Current model: ...` followed by the model's own answer.
#[must_use]
pub fn render(resp: &ChatCompletionResponse) -> String {
    format!(
        "Current model: {}\n\nResponse: {}",
        resp.model,
        resp.first_content().unwrap_or("(no response)")
    )
}
