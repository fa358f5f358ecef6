//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration or startup failure (duplicate tool, bad base URL).
    Config(String),
    /// MCP transport or service failure.
    Mcp(String),
    /// No tool is registered under the requested name.
    UnknownTool(String),
    /// Tool arguments failed schema validation.
    InvalidInput {
        /// Offending argument name.
        field: String,
        /// What was wrong with it.
        message: String,
    },
    /// Outbound HTTP request could not be completed.
    Request(String),
    /// Inference server answered with a non-success status.
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },
    /// Response body was not the JSON we expected.
    Parse(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Mcp(msg) => write!(f, "mcp: {msg}"),
            Self::UnknownTool(name) => write!(f, "unknown tool: {name}"),
            Self::InvalidInput { field, message } => {
                write!(f, "invalid input for `{field}`: {message}")
            }
            Self::Request(msg) => write!(f, "request failed: {msg}"),
            Self::Http {
                status,
                status_text,
            } => write!(f, "HTTP error {status}: {status_text}"),
            Self::Parse(msg) => write!(f, "response parsing failed: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() {
            "connection failed"
        } else if err.is_timeout() {
            "timed out"
        } else {
            "transport error"
        };
        Self::Request(format!("{kind}: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
