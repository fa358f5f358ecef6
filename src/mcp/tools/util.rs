//! Shared utilities for MCP tool handlers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::mcp::registry::{Arguments, ToolOutput};
use crate::{AppError, Result};

/// Hint appended to chat-backed failures.
pub const LOADED_MODEL_HINT: &str = "Make sure a model is loaded in LM Studio.";

/// Decode validated arguments into the tool's typed input.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if the arguments do not match `T`.
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Arguments) -> Result<T> {
    serde_json::from_value(Value::Object(args)).map_err(|err| AppError::InvalidInput {
        field: "arguments".into(),
        message: format!("invalid {tool} parameters: {err}"),
    })
}

/// Render a caught error as tool content: `"<context>: <err>"`, followed by
/// `hint` on its own paragraph.
#[must_use]
pub fn failure(context: &str, err: &AppError, hint: Option<&str>) -> ToolOutput {
    let text = match hint {
        Some(hint) => format!("{context}: {err}\n\n{hint}"),
        None => format!("{context}: {err}"),
    };
    ToolOutput::failure(text)
}
