//! `lmstudio_list_models` tool: lists the models LM Studio exposes.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use super::util::failure;
use crate::lmstudio::models::ModelList;
use crate::lmstudio::LmStudioClient;
use crate::mcp::registry::{Arguments, ToolDefinition, ToolOutput};
use crate::Result;

/// Registered tool name.
pub const NAME: &str = "lmstudio_list_models";

/// Text returned when LM Studio reports an empty model list.
pub const NO_MODELS: &str = "No models found in LM Studio.";

/// Tool definition advertised through `tools/list`.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        NAME,
        "List LM Studio Models",
        "List all models available in LM Studio.",
    )
}

/// Handle the `lmstudio_list_models` tool call.
///
/// Forwarder failures are reported as a failure output, never as `Err`.
///
/// # Errors
///
/// Infallible in practice; the signature matches the registry contract.
pub async fn handle(client: Arc<LmStudioClient>, _args: Arguments) -> Result<ToolOutput> {
    let span = info_span!("lmstudio_list_models");

    async move {
        match client.list_models().await {
            Ok(list) => {
                info!(count = list.data.len(), "listed lm studio models");
                Ok(ToolOutput::text(render(&list)))
            }
            Err(err) => Ok(failure("Error listing models", &err, None)),
        }
    }
    .instrument(span)
    .await
}

/// Numbered, 1-indexed listing in server order.
#[must_use]
pub fn render(list: &ModelList) -> String {
    if list.data.is_empty() {
        return NO_MODELS.to_owned();
    }

    let mut text = String::from("Available models in LM Studio:\n");
    for (i, model) in list.data.iter().enumerate() {
        let _ = write!(text, "\n{}. {}", i + 1, model.id);
    }
    text
}
