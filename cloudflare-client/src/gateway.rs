//! Validator gateway
//!
//! Turns a caller's [`CallDescriptor`] into a [`PreparedCall`]: query defaults
//! and pagination flags are applied, the composed schema is checked, and the
//! normalized payload becomes the immutable input of the executor and
//! paginator. Nothing here performs I/O.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{ClientConfig, resolve_raw};
use crate::error::{ClientError, Result};
use crate::path::resolve_path;
use crate::schema::{AUTO_PAGINATION_CONCURRENCY, EndpointSchema, compose, prepare_query};
use crate::types::{CallDescriptor, Method, RequestBody};
use crate::validator::{Validator, Violation};

/// A validated, normalized call ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub callee: String,
    pub method: Method,
    /// Path template, resolved against `params` when the URL is built.
    pub path: String,
    pub params: Map<String, Value>,
    /// Query without pagination flags; empty when the call had none.
    pub query: Map<String, Value>,
    pub body: Option<RequestBody>,
    pub required: Option<String>,
    /// Resolved raw setting for this call.
    pub raw: bool,
    pub content_type: Option<String>,
    /// Page concurrency when the call is auto-paginated.
    pub pagination: Option<usize>,
}

impl PreparedCall {
    pub fn resolved_path(&self) -> String {
        resolve_path(&self.path, &self.params)
    }

    /// Copy of this call for a single page of a listing.
    #[must_use]
    pub fn for_page(&self, page: u32, raw: bool) -> Self {
        let mut call = self.clone();
        call.query.insert("page".to_string(), Value::from(page));
        call.raw = raw;
        call.pagination = None;
        call
    }
}

/// Validation stage in front of the executor.
#[derive(Clone)]
pub struct ValidatorGateway {
    validator: Arc<dyn Validator>,
}

impl ValidatorGateway {
    pub fn new(validator: Arc<dyn Validator>) -> Self {
        Self { validator }
    }

    /// Validate `call` against `fragment` and normalize it.
    ///
    /// `raw` overrides the descriptor's own raw flag when set.
    pub fn prepare(
        &self,
        config: &ClientConfig,
        fragment: &EndpointSchema,
        mut call: CallDescriptor,
        raw: Option<bool>,
    ) -> Result<PreparedCall> {
        if raw.is_some() {
            call.raw = raw;
        }

        let flags = prepare_query(
            fragment,
            &mut call,
            config.items_per_page,
            config.auto_pagination,
        )?;

        let mut payload = descriptor_payload(&call);
        if let Some(pagination) = flags.to_value() {
            payload.insert("pagination".to_string(), pagination);
        }

        let schema = compose(fragment);
        let normalized = self
            .validator
            .validate(&schema, &Value::Object(payload))
            .map_err(|violations| validation_error(&call, violations))?;

        let concurrency = normalized
            .get("pagination")
            .and_then(|p| p.get(AUTO_PAGINATION_CONCURRENCY))
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(config.auto_pagination_concurrency)
            .max(1);

        let checked: CallDescriptor =
            serde_json::from_value(normalized).map_err(|e| ClientError::Serialization {
                callee: call.callee.clone(),
                detail: format!("Failed to read normalized call: {e}"),
            })?;

        let Some(method) = checked.method else {
            return Err(validation_error(
                &call,
                vec![Violation::new("method", "is required")],
            ));
        };

        log::debug!(
            "[{}] validated {method} /{}",
            checked.callee,
            resolve_path(&checked.path, &checked.params)
        );

        Ok(PreparedCall {
            raw: resolve_raw(checked.raw, config.raw),
            callee: checked.callee,
            method,
            path: checked.path,
            params: checked.params,
            query: checked.query.unwrap_or_default(),
            body: checked.body,
            required: checked.required,
            content_type: checked.content_type,
            pagination: flags.enabled.then_some(concurrency),
        })
    }
}

/// JSON payload of a descriptor; absent and empty fields are left out so the
/// validator reports them as missing.
fn descriptor_payload(call: &CallDescriptor) -> Map<String, Value> {
    let mut payload = Map::new();
    let mut put_str = |key: &str, value: Option<&str>| {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            payload.insert(key.to_string(), Value::String(v.to_string()));
        }
    };
    put_str("callee", Some(call.callee.as_str()));
    put_str("method", call.method.map(Method::as_str));
    put_str("path", Some(call.path.as_str()));
    put_str("required", call.required.as_deref());
    put_str("content_type", call.content_type.as_deref());

    if !call.params.is_empty() {
        payload.insert("params".to_string(), Value::Object(call.params.clone()));
    }
    if let Some(query) = &call.query {
        payload.insert("query".to_string(), Value::Object(query.clone()));
    }
    if let Some(body) = &call.body {
        payload.insert("body".to_string(), body.to_value());
    }
    if let Some(raw) = call.raw {
        payload.insert("raw".to_string(), Value::Bool(raw));
    }
    payload
}

fn validation_error(call: &CallDescriptor, violations: Vec<Violation>) -> ClientError {
    ClientError::Validation {
        callee: call.callee.clone(),
        method: call.method_label(),
        path: resolve_path(&call.path, &call.params),
        violations,
    }
}
