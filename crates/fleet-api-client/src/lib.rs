//! Shared HTTP client for the fleet backend API.
//!
//! Provides a minimal client with explicit auth, one JSON request helper and the record
//! submission methods (api). The client is built once per session and shared; no
//! credentials live in global state.

pub mod api;

use anyhow::{Context, Result};
use fleet_core::EvidenceConfig;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// No credentials (local development backends)
    None,
}

/// Errors returned by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("API request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        /// `error` or `message` field of the response body, when present
        message: Option<String>,
    },

    #[error("Failed to send request: {0}")]
    Transport(String),

    #[error("Failed to parse response as JSON: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message sent by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Extract `error` (preferred) or `message` from a JSON error body.
pub(crate) fn server_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"].iter().find_map(|field| {
        value
            .get(*field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
    })
}

/// HTTP client for the fleet backend with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        Self::with_timeout(base_url, auth, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create client from loaded configuration. Requires `FLEET_API_TOKEN`.
    pub fn from_config(config: &EvidenceConfig) -> Result<Self> {
        let token = config
            .api_token
            .clone()
            .context("Missing API token. Set FLEET_API_TOKEN")?;

        Self::with_timeout(
            config.api_url.clone(),
            Auth::Bearer(token),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path onto the base URL; paths without a leading slash get one.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::None => request,
        }
    }

    /// Send a JSON body with the given method and return the response body.
    ///
    /// A 2xx response with an empty body yields `Value::Null`.
    pub async fn send_json<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.build_url(path);
        let request = self.client.request(method.clone(), &url).json(body);
        let request = self.apply_auth(request);

        let start = std::time::Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = server_error_message(&text);
            tracing::warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                error = message.as_deref().unwrap_or(""),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "API request failed"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "API request succeeded"
        );

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
