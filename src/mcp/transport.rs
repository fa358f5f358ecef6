//! Stdio transport setup.
//!
//! Wires [`LmStudioBridgeServer`] to stdin/stdout. Nothing else may write to
//! stdout while the service runs.

use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::handler::LmStudioBridgeServer;
use crate::{AppError, Result};

/// Serve the MCP server over stdio until stdin closes or `ct` fires.
///
/// # Errors
///
/// Returns `AppError::Mcp` if the transport fails to initialize or the
/// service terminates abnormally.
pub async fn serve_stdio(server: LmStudioBridgeServer, ct: CancellationToken) -> Result<()> {
    let transport = stdio();

    info!("starting stdio MCP transport");
    let service = server
        .serve_with_ct(transport, ct)
        .await
        .map_err(|err| AppError::Mcp(format!("stdio transport failed: {err}")))?;

    let reason = service
        .waiting()
        .await
        .map_err(|err| AppError::Mcp(format!("stdio service error: {err}")))?;

    info!(?reason, "stdio MCP transport shut down");
    Ok(())
}
