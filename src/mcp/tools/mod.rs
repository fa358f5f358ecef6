//! MCP tool handlers and the registry wiring them together.

pub mod chat_completion;
pub mod current_model;
pub mod echo;
pub mod list_models;
pub mod util;

use std::sync::Arc;

use crate::lmstudio::LmStudioClient;
use crate::mcp::registry::ToolRegistry;
use crate::Result;

/// Build the registry with every tool, in `tools/list` order.
///
/// # Errors
///
/// Returns `AppError::Config` if two tools share a name.
pub fn build_registry(client: &Arc<LmStudioClient>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    registry.register(echo::definition(), echo::handle)?;

    let c = Arc::clone(client);
    registry.register(list_models::definition(), move |args| {
        list_models::handle(Arc::clone(&c), args)
    })?;

    let c = Arc::clone(client);
    registry.register(current_model::definition(), move |args| {
        current_model::handle(Arc::clone(&c), args)
    })?;

    let c = Arc::clone(client);
    registry.register(chat_completion::definition(), move |args| {
        chat_completion::handle(Arc::clone(&c), args)
    })?;

    Ok(registry)
}
