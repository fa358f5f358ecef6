#![forbid(unsafe_code)]

//! `lmstudio-mcp-bridge`: MCP stdio server binary.
//!
//! Parses `--base-url`, builds the tool registry, and serves MCP over
//! stdin/stdout until the client disconnects or a shutdown signal arrives.
//! Logs go to stderr; stdout carries only protocol frames.

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use lmstudio_mcp_bridge::cli::Cli;
use lmstudio_mcp_bridge::lmstudio::LmStudioClient;
use lmstudio_mcp_bridge::mcp::handler::LmStudioBridgeServer;
use lmstudio_mcp_bridge::mcp::{tools, transport};
use lmstudio_mcp_bridge::{AppError, Result};

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing()?;
    info!("lmstudio-mcp-bridge bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
        .inspect_err(|err| error!(%err, "lmstudio-mcp-bridge terminated with error"))
}

async fn run(args: Cli) -> Result<()> {
    let config = args.config()?;
    info!(base_url = config.base_url(), "configuration loaded");

    let client = Arc::new(LmStudioClient::new(config));
    let registry = Arc::new(tools::build_registry(&client)?);
    info!(tools = registry.len(), "tool registry built");

    let server = LmStudioBridgeServer::new(registry);

    let ct = CancellationToken::new();
    let signal_ct = ct.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        signal_ct.cancel();
    });

    transport::serve_stdio(server, ct).await?;
    info!("lmstudio-mcp-bridge shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))
}
