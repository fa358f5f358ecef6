//! HTTP forwarder for the LM Studio `/v1` API.
//!
//! Every LM Studio-backed tool goes through [`LmStudioClient::request`],
//! which performs exactly one outbound call and classifies failures into
//! transport, HTTP status, and body parsing errors.

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelList};
use crate::config::BridgeConfig;
use crate::{AppError, Result};

/// Model identifier sent with chat completions. LM Studio answers with
/// whichever model is currently loaded.
pub const DEFAULT_MODEL: &str = "local-model";

/// HTTP method of a forwarded request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// Uppercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Client for a single LM Studio server.
///
/// Holds no per-request state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LmStudioClient {
    http: reqwest::Client,
    config: BridgeConfig,
}

impl LmStudioClient {
    /// Create a client targeting `config`'s base URL.
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Perform one request against `<base_url>/v1<endpoint>` and parse the
    /// body as JSON.
    ///
    /// # Errors
    ///
    /// - `AppError::Request` when the connection or body read fails.
    /// - `AppError::Http` when the status is outside `200..=299`.
    /// - `AppError::Parse` when the body is not valid JSON.
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        let url = self.config.endpoint_url(endpoint);
        debug!(method = method.as_str(), %url, "forwarding request to lm studio");

        let mut builder = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        }
        .header(CONTENT_TYPE, "application/json");

        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            warn!(%url, %err, "lm studio request failed");
            AppError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "lm studio returned an error status");
            return Err(AppError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            warn!(%url, %err, "lm studio response is not valid json");
            AppError::Parse(format!("invalid JSON from {url}: {err}"))
        })
    }

    /// `GET /v1/models`.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::request`] failures; a body that is JSON but not a
    /// model list is `AppError::Parse`.
    pub async fn list_models(&self) -> Result<ModelList> {
        let value = self.request("/models", Method::Get, None, &[]).await?;
        decode(value)
    }

    /// `POST /v1/chat/completions` with `messages` in the given order.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::request`] failures; a body that is JSON but not a
    /// completion is `AppError::Parse`.
    pub async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse> {
        let body = serde_json::to_value(ChatCompletionRequest {
            model: DEFAULT_MODEL.to_owned(),
            messages,
        })?;
        let value = self
            .request("/chat/completions", Method::Post, Some(&body), &[])
            .await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(AppError::from)
}
