//! Command-line interface.

use clap::Parser;

use crate::config::BridgeConfig;
use crate::Result;

/// MCP stdio server forwarding tool calls to LM Studio.
#[derive(Debug, Parser)]
#[command(name = "lmstudio-mcp-bridge", version, long_about = None)]
pub struct Cli {
    /// Base URL of the LM Studio server [default: http://localhost:1234].
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl Cli {
    /// Resolve the bridge configuration from the parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `--base-url` is not a valid http(s) URL.
    pub fn config(&self) -> Result<BridgeConfig> {
        BridgeConfig::new(self.base_url.as_deref())
    }
}
