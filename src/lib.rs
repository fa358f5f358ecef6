#![forbid(unsafe_code)]

//! Model Context Protocol bridge to a local LM Studio server.

pub mod cli;
pub mod config;
pub mod errors;
pub mod lmstudio;
pub mod mcp;

pub use config::BridgeConfig;
pub use errors::{AppError, Result};
