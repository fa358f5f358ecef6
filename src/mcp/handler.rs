//! MCP server handler backed by the [`ToolRegistry`].

use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::json;
use tracing::{info_span, warn, Instrument};

use super::registry::{ContentBlock, ToolDefinition, ToolOutput, ToolRegistry};
use crate::AppError;

const INSTRUCTIONS: &str = "Bridge to a local LM Studio server. Use lmstudio_list_models to see \
     available models, lmstudio_get_current_model to identify the loaded one, and \
     lmstudio_chat_completion to send a prompt.";

/// MCP server exposing the registry's tools.
#[derive(Debug, Clone)]
pub struct LmStudioBridgeServer {
    registry: Arc<ToolRegistry>,
}

impl LmStudioBridgeServer {
    /// Create a server over a fully built registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Tool list in the shape `tools/list` returns.
    #[must_use]
    pub fn all_tools(&self) -> Vec<Tool> {
        self.registry.list_tools().map(to_rmcp_tool).collect()
    }

    /// Run a tool and translate the outcome into an MCP result.
    ///
    /// # Errors
    ///
    /// Unknown tools and invalid arguments become `invalid_params`; any other
    /// error escaping a handler becomes `internal_error`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        match self.registry.invoke(name, arguments).await {
            Ok(output) => Ok(to_call_result(output)),
            Err(AppError::UnknownTool(name)) => Err(rmcp::ErrorData::invalid_params(
                format!("unknown tool: {name}"),
                None,
            )),
            Err(AppError::InvalidInput { field, message }) => {
                let data = json!({ "field": field });
                let err = AppError::InvalidInput { field, message };
                Err(rmcp::ErrorData::invalid_params(err.to_string(), Some(data)))
            }
            Err(err) => Err(rmcp::ErrorData::internal_error(err.to_string(), None)),
        }
    }
}

fn to_rmcp_tool(definition: &ToolDefinition) -> Tool {
    let mut tool = Tool::new(
        definition.name.clone(),
        definition.description.clone(),
        Arc::new(definition.input_schema()),
    );
    tool.title = Some(definition.title.clone());
    tool
}

/// Handler failures stay regular results so the client always gets text.
fn to_call_result(output: ToolOutput) -> CallToolResult {
    if output.failed {
        warn!(text = output.first_text().unwrap_or_default(), "tool reported failure");
    }
    let content = output
        .content
        .into_iter()
        .map(|ContentBlock::Text(text)| Content::text(text))
        .collect();
    CallToolResult::success(content)
}

impl ServerHandler for LmStudioBridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::default()
            },
            instructions: Some(INSTRUCTIONS.into()),
            ..ServerInfo::default()
        }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, rmcp::ErrorData>> + Send + '_ {
        let span = info_span!("call_tool", tool = %request.name);

        async move { self.dispatch(&request.name, request.arguments).await }.instrument(span)
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, rmcp::ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.all_tools())))
    }
}
