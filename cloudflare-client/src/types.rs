use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============ HTTP Method ============

/// HTTP verbs accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// All verbs, in the order used by validation messages.
    pub const ALL: [Self; 5] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
    ];

    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    /// Parse an upper-case wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Request Body ============

/// Content type sent when the call does not override it.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Body of a call.
///
/// Structured bodies are serialized to JSON before transmission; text bodies
/// (e.g. a Workers script) are sent verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    Text(String),
    Json(Value),
}

impl RequestBody {
    /// JSON view of the body, used when validating it.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    /// Whether the body is a structured JSON document.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json(Value::Object(_) | Value::Array(_)))
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Json(other),
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

// ============ Call Descriptor ============

/// Description of one API operation as supplied by a facade method.
///
/// `callee`, `method` and `path` are mandatory; the validator rejects a
/// descriptor that lacks any of them before a request is issued. Pagination is
/// requested through the `auto_pagination` / `auto_pagination_concurrency` keys
/// of `query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallDescriptor {
    /// Operation name, used for diagnostics only.
    #[serde(default)]
    pub callee: String,
    #[serde(default)]
    pub method: Option<Method>,
    /// Path template relative to the API base, with `:name` placeholders.
    #[serde(default)]
    pub path: String,
    /// Values substituted into the path placeholders.
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub query: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<RequestBody>,
    /// Response field the call unwraps; its absence on a 2xx response is an error.
    #[serde(default)]
    pub required: Option<String>,
    /// Per-call override of the client's raw setting.
    #[serde(default)]
    pub raw: Option<bool>,
    /// Content type override for text bodies.
    #[serde(default)]
    pub content_type: Option<String>,
}

impl CallDescriptor {
    pub fn new(callee: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            method: Some(method),
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn query(mut self, query: Map<String, Value>) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn required(mut self, field: impl Into<String>) -> Self {
        self.required = Some(field.into());
        self
    }

    #[must_use]
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = Some(raw);
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Method name for diagnostics, `?` when absent.
    pub(crate) fn method_label(&self) -> String {
        self.method
            .map_or_else(|| "?".to_string(), |m| m.as_str().to_string())
    }
}

// ============ Response Envelope ============

/// Standard wrapper returned by the API around every response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
    #[serde(default)]
    pub errors: Option<Vec<ApiMessage>>,
    #[serde(default)]
    pub messages: Option<Vec<ApiMessage>>,
}

impl ResponseEnvelope {
    /// Total page count advertised by the envelope, when the listing paginates.
    pub fn total_pages(&self) -> Option<u32> {
        self.result_info
            .as_ref()
            .and_then(|info| info.total_pages)
            .filter(|pages| *pages > 0)
    }

    /// First entry of `errors`, which carries the code surfaced on failures.
    pub fn first_error(&self) -> Option<&ApiMessage> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }
}

/// `result_info.total_pages` of a raw response body.
///
/// Read straight from the JSON so unrelated envelope fields of an unexpected
/// shape do not hide the page count.
pub fn total_pages_of(body: &Value) -> Option<u32> {
    body.pointer("/result_info/total_pages")
        .and_then(Value::as_u64)
        .and_then(|pages| u32::try_from(pages).ok())
        .filter(|pages| *pages > 0)
}

/// Code and message of `errors[0]` of a raw response body.
pub fn first_error_of(body: &Value) -> Option<(Option<i64>, String)> {
    let first = body.pointer("/errors/0")?;
    if let Value::String(message) = first {
        return Some((None, message.clone()));
    }
    let code = first.get("code").and_then(Value::as_i64);
    let message = match first.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Some((code, message))
}

/// Pagination metadata of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

/// Entry of the envelope's `errors` or `messages` arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}
