//! Bridge configuration: inference server location and endpoint URLs.

use reqwest::Url;

use crate::{AppError, Result};

/// Base URL used when `--base-url` is not supplied.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234";

/// Path segment inserted between the base URL and every endpoint.
pub const API_PREFIX: &str = "/v1";

/// Runtime configuration for the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    base_url: String,
}

impl BridgeConfig {
    /// Build a configuration from an optional `--base-url` override.
    ///
    /// Falls back to [`DEFAULT_BASE_URL`] when `base_url` is `None`. A trailing
    /// `/` is trimmed so endpoint joins never produce `//v1`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the URL does not parse or is not
    /// `http`/`https`.
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let raw = base_url.unwrap_or(DEFAULT_BASE_URL).trim();
        let parsed = Url::parse(raw)
            .map_err(|err| AppError::Config(format!("invalid base url `{raw}`: {err}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "invalid base url `{raw}`: scheme must be http or https"
            )));
        }

        Ok(Self {
            base_url: raw.trim_end_matches('/').to_owned(),
        })
    }

    /// Base URL of the inference server, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API endpoint such as `/models`.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{API_PREFIX}{endpoint}", self.base_url)
        } else {
            format!("{}{API_PREFIX}/{endpoint}", self.base_url)
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}
