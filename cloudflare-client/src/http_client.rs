//! HTTP transport
//!
//! The request executor talks to the network through the [`HttpExecutor`]
//! trait, so tests and embedders can swap the transport. [`ReqwestExecutor`]
//! is the default implementation.
//!
//! # design principles
//! - **Transport only** - no status interpretation, no retries; a response with
//!   any status code is a successful exchange at this layer
//! - **Owned request/response values** - attempts can be replayed by cloning

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ClientError, Result};
use crate::types::Method;
use crate::utils::log_sanitizer::truncate_for_log;

/// A fully built HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Failure to obtain any HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub detail: String,
    pub timeout: bool,
}

impl TransportError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            timeout: false,
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            timeout: true,
        }
    }
}

/// Pluggable HTTP capability.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(
        &self,
        request: HttpRequest,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// [`HttpExecutor`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Build a client with the given connect and overall request timeouts.
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ClientError::Config {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(
        &self,
        request: HttpRequest,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::timeout(e.to_string())
            } else {
                TransportError::new(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[cloudflare] Response Status: {status}");

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Failed to read response body: {e}")))?;

        log::debug!("[cloudflare] Response Body: {}", truncate_for_log(&body));

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
