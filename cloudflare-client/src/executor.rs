//! Request executor
//!
//! Builds the wire request for a [`PreparedCall`], sends it through the
//! configured [`HttpExecutor`] with linear retry backoff, and interprets the
//! response envelope.
//!
//! # Retry strategy
//! - Every failure an attempt produces is retried: transport errors, non-2xx
//!   statuses (4xx included) and 2xx responses missing the required field
//! - Linear backoff: after failed attempt `n` the executor waits
//!   `n × retry_delay` (1s, 2s, 3s, ... with the default delay)
//! - The error of the last attempt is returned once attempts are exhausted

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::{AuthMode, ClientConfig};
use crate::error::{ClientError, Result};
use crate::gateway::PreparedCall;
use crate::http_client::{HttpExecutor, HttpRequest, HttpResponse};
use crate::path::param_to_string;
use crate::types::{DEFAULT_CONTENT_TYPE, RequestBody, first_error_of};
use crate::utils::json::{is_truthy, or_empty_object};
use crate::utils::log_sanitizer::truncate_for_log;

/// Issues single API calls.
#[derive(Clone)]
pub struct RequestExecutor {
    config: Arc<ClientConfig>,
    http: Arc<dyn HttpExecutor>,
}

impl RequestExecutor {
    pub fn new(config: Arc<ClientConfig>, http: Arc<dyn HttpExecutor>) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute `call` and resolve with the interpreted response.
    pub async fn execute(&self, call: &PreparedCall) -> Result<Value> {
        let request = self.build_request(call)?;
        let attempts = self.config.attempts();

        let mut attempt = 1;
        loop {
            if attempt == 1 {
                log::debug!("[cloudflare] {} \"{}\"", request.method, request.url);
            } else {
                log::debug!(
                    "[cloudflare attempt {attempt}] {} \"{}\"",
                    request.method,
                    request.url
                );
            }

            match self.attempt(call, request.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts && e.is_retryable() => {
                    let delay = backoff_delay(self.config.retry_delay, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        call.callee,
                        attempt,
                        attempts,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(&self, call: &PreparedCall, request: HttpRequest) -> Result<Value> {
        let url = request.url.clone();
        let response = self.http.execute(request).await.map_err(|e| {
            ClientError::Request {
                callee: call.callee.clone(),
                method: call.method.to_string(),
                url,
                detail: e.detail,
                timeout: e.timeout,
            }
        })?;
        interpret(call, &response)
    }

    /// Wire request for `call`: URL, authentication headers and encoded body.
    pub fn build_request(&self, call: &PreparedCall) -> Result<HttpRequest> {
        let url = build_url(&self.config.base_url, &call.resolved_path(), &call.query);

        let body = match &call.body {
            Some(RequestBody::Json(value)) => Some(serde_json::to_string(value).map_err(|e| {
                ClientError::Serialization {
                    callee: call.callee.clone(),
                    detail: e.to_string(),
                }
            })?),
            Some(RequestBody::Text(text)) => Some(text.clone()),
            None => None,
        };

        Ok(HttpRequest {
            method: call.method,
            url,
            headers: auth_headers(&self.config.auth, call),
            body,
        })
    }
}

/// `base/path`, plus `?query` when the query has at least one key.
pub fn build_url(base_url: &str, path: &str, query: &Map<String, Value>) -> String {
    let mut url = format!("{base_url}/{path}");
    let query_string = encode_query(query);
    if !query_string.is_empty() {
        url.push('?');
        url.push_str(&query_string);
    }
    url
}

/// Percent-encoded `key=value` pairs; arrays repeat the key, null and nested
/// objects encode as an empty value.
pub fn encode_query(query: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in query {
        let key = urlencoding::encode(key);
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{key}={}", urlencoding::encode(&query_value(item))));
                }
            }
            other => pairs.push(format!("{key}={}", urlencoding::encode(&query_value(other)))),
        }
    }
    pairs.join("&")
}

fn query_value(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => String::new(),
        other => param_to_string(other),
    }
}

/// Authentication headers plus `Content-Type`.
///
/// Bearer tokens always declare JSON. Key/email credentials declare JSON for
/// structured bodies and the call's own content type otherwise.
fn auth_headers(auth: &AuthMode, call: &PreparedCall) -> Vec<(String, String)> {
    match auth {
        AuthMode::Token { token } => vec![
            ("Authorization".to_string(), format!("Bearer {token}")),
            ("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string()),
        ],
        AuthMode::Legacy { key, email } => {
            let content_type = match &call.body {
                Some(body) if body.is_structured() => DEFAULT_CONTENT_TYPE,
                _ => call.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE),
            };
            vec![
                ("X-Auth-Key".to_string(), key.clone()),
                ("X-Auth-Email".to_string(), email.clone()),
                ("Content-Type".to_string(), content_type.to_string()),
            ]
        }
    }
}

/// Delay after failed attempt `attempt` (1-based).
pub fn backoff_delay(unit: Duration, attempt: u32) -> Duration {
    unit.saturating_mul(attempt)
}

fn parse_body(call: &PreparedCall, response: &HttpResponse) -> Result<Value> {
    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    if !response.is_json() {
        return Ok(Value::String(response.body.clone()));
    }
    serde_json::from_str(&response.body).map_err(|e| {
        log::error!("[{}] JSON parse failed: {e}", call.callee);
        log::error!(
            "[{}] Raw response: {}",
            call.callee,
            truncate_for_log(&response.body)
        );
        ClientError::Parse {
            callee: call.callee.clone(),
            detail: e.to_string(),
        }
    })
}

fn interpret(call: &PreparedCall, response: &HttpResponse) -> Result<Value> {
    let body = parse_body(call, response)?;

    if !response.is_success() {
        let (error_code, message) = error_details(&body, response);
        return Err(ClientError::Api {
            callee: call.callee.clone(),
            method: call.method.to_string(),
            path: call.resolved_path(),
            status: response.status,
            error_code,
            message,
        });
    }

    if let Some(field) = &call.required
        && !body.get(field).is_some_and(is_truthy)
    {
        return Err(ClientError::MissingResultField {
            callee: call.callee.clone(),
            method: call.method.to_string(),
            path: call.resolved_path(),
            field: field.clone(),
        });
    }

    if call.raw {
        return Ok(or_empty_object(Some(body)));
    }
    match &call.required {
        Some(field) => Ok(or_empty_object(body.get(field).cloned())),
        None => Ok(or_empty_object(Some(body))),
    }
}

fn error_details(body: &Value, response: &HttpResponse) -> (Option<i64>, String) {
    if let Some(first) = first_error_of(body) {
        return first;
    }
    let message = if response.body.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        truncate_for_log(&response.body)
    };
    (None, message)
}
