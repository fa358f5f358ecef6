//! `echo` tool: returns its input prefixed with `Echo: `.

use serde::Deserialize;
use tracing::debug;

use super::util::parse_args;
use crate::mcp::registry::{Arguments, ParamKind, ParamSpec, ToolDefinition, ToolOutput};
use crate::Result;

/// Registered tool name.
pub const NAME: &str = "echo";

#[derive(Debug, Deserialize)]
struct EchoInput {
    text: String,
}

/// Tool definition advertised through `tools/list`.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition::new(NAME, "Echo", "Echo back the provided text.").param(
        ParamSpec::required("text", ParamKind::String).describe("Text to echo back"),
    )
}

/// Handle the `echo` tool call.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if `text` is missing.
#[allow(clippy::unused_async)]
pub async fn handle(args: Arguments) -> Result<ToolOutput> {
    let input: EchoInput = parse_args(NAME, args)?;
    debug!(len = input.text.len(), "echo");
    Ok(ToolOutput::text(format!("Echo: {}", input.text)))
}
