//! Schema composition
//!
//! Each endpoint contributes an [`EndpointSchema`] fragment describing its path
//! parameters, query and body. [`compose`] layers that fragment under the
//! framework fields every call carries and returns a fresh JSON Schema
//! document; the fragment itself is never modified.

use serde_json::{Map, Value};

use crate::config::MAX_ITEMS_PER_PAGE;
use crate::error::{ClientError, Result};
use crate::types::{CallDescriptor, Method, RequestBody};
use crate::validator::{FieldRule, ObjectSchema};

/// Query key requesting client-side aggregation of every page.
pub const AUTO_PAGINATION: &str = "auto_pagination";
/// Query key overriding the number of pages fetched concurrently.
pub const AUTO_PAGINATION_CONCURRENCY: &str = "auto_pagination_concurrency";

const PAGE: &str = "page";
const PER_PAGE: &str = "per_page";

/// Endpoint-specific part of a call schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointSchema {
    pub params: Option<ObjectSchema>,
    pub query: Option<ObjectSchema>,
    pub body: Option<FieldRule>,
}

impl EndpointSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn params(mut self, params: ObjectSchema) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn query(mut self, query: ObjectSchema) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub fn body(mut self, body: FieldRule) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether the endpoint declares `query.auto_pagination`.
    pub fn supports_pagination(&self) -> bool {
        self.query
            .as_ref()
            .is_some_and(|query| query.contains(AUTO_PAGINATION))
    }
}

/// Full validation schema for one call: `fragment` plus the framework fields,
/// rendered as JSON Schema.
pub fn compose(fragment: &EndpointSchema) -> Value {
    let base_query = ObjectSchema::new()
        .field(PER_PAGE, FieldRule::number().min(1.0).max(f64::from(MAX_ITEMS_PER_PAGE)))
        .field(PAGE, FieldRule::number().min(1.0));
    let query = match &fragment.query {
        Some(endpoint_query) => endpoint_query.layered_over(&base_query),
        None => base_query,
    };

    let pagination = ObjectSchema::new()
        .field(AUTO_PAGINATION, FieldRule::boolean())
        .field(AUTO_PAGINATION_CONCURRENCY, FieldRule::integer().min(1.0));

    let mut schema = ObjectSchema::new()
        .field("callee", FieldRule::string().required())
        .field(
            "method",
            FieldRule::string()
                .valid(Method::ALL.iter().map(|m| m.as_str()))
                .required(),
        )
        .field("path", FieldRule::string().required())
        .field("required", FieldRule::string())
        .field("content_type", FieldRule::string())
        .field("raw", FieldRule::boolean())
        .field("query", FieldRule::object(query))
        .field("pagination", FieldRule::object(pagination));

    if let Some(params) = &fragment.params {
        schema = schema.field("params", FieldRule::object(params.clone()));
    }
    if let Some(body) = &fragment.body {
        schema = schema.field("body", body.clone());
    }
    schema.to_json_schema()
}

/// Pagination flags pulled out of a call's query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationFlags {
    /// Whether the call will be auto-paginated.
    pub enabled: bool,
    /// Explicit `auto_pagination_concurrency`, still unvalidated.
    pub concurrency: Option<Value>,
    /// Explicit `auto_pagination` value, still unvalidated.
    pub requested: Option<Value>,
}

impl PaginationFlags {
    /// Payload representation validated under the `pagination` key.
    pub fn to_value(&self) -> Option<Value> {
        if self.requested.is_none() && self.concurrency.is_none() {
            return None;
        }
        let mut map = Map::new();
        if let Some(requested) = &self.requested {
            map.insert(AUTO_PAGINATION.to_string(), requested.clone());
        }
        if let Some(concurrency) = &self.concurrency {
            map.insert(AUTO_PAGINATION_CONCURRENCY.to_string(), concurrency.clone());
        }
        Some(Value::Object(map))
    }
}

/// Insert `page=1` and `per_page=items_per_page` unless the caller set them.
pub fn apply_query_defaults(query: &mut Map<String, Value>, items_per_page: u32) {
    query
        .entry(PAGE.to_string())
        .or_insert_with(|| Value::from(1));
    query
        .entry(PER_PAGE.to_string())
        .or_insert_with(|| Value::from(items_per_page));
}

/// Normalize a call's query in place and work out whether it paginates.
///
/// - `page=1` and `per_page=items_per_page` are filled in when absent
/// - `page` / `per_page` found in a JSON body move to the query
/// - `auto_pagination` keys are removed from the query; an explicit request on
///   an endpoint without pagination support fails before any I/O
pub fn prepare_query(
    fragment: &EndpointSchema,
    call: &mut CallDescriptor,
    items_per_page: u32,
    client_auto_pagination: bool,
) -> Result<PaginationFlags> {
    let Some(query) = call.query.as_mut() else {
        return Ok(PaginationFlags::default());
    };

    apply_query_defaults(query, items_per_page);

    if let Some(RequestBody::Json(Value::Object(body))) = call.body.as_mut() {
        for key in [PER_PAGE, PAGE] {
            if let Some(value) = body.remove(key) {
                query.insert(key.to_string(), value);
            }
        }
    }

    let requested = query.remove(AUTO_PAGINATION);
    let concurrency = query.remove(AUTO_PAGINATION_CONCURRENCY);

    let enabled = match &requested {
        Some(value) => wants_pagination(value),
        None => client_auto_pagination && fragment.supports_pagination(),
    };

    if enabled && !fragment.supports_pagination() {
        return Err(ClientError::PaginationUnsupported {
            callee: call.callee.clone(),
        });
    }

    Ok(PaginationFlags {
        enabled,
        concurrency,
        requested,
    })
}

fn wants_pagination(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}
