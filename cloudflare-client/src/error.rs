use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validator::Violation;

/// Unified error type for every call issued through the client.
///
/// Variants that come out of a request attempt carry the callee, the HTTP method
/// and the resolved path (or URL) so a failure can be traced back to the exact
/// operation that produced it. All variants are serializable for structured
/// error reporting.
///
/// # Retryable Errors
///
/// The request executor applies the same retry policy to every failure produced
/// by an attempt:
/// - [`Request`](Self::Request) — transport failure, no HTTP response
/// - [`Api`](Self::Api) — HTTP status outside `200..=299`
/// - [`MissingResultField`](Self::MissingResultField) — 2xx without the required field
/// - [`Parse`](Self::Parse) — JSON response body that could not be parsed
///
/// Validation, pagination usage and configuration errors are raised before any
/// request is sent and are never retried.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ClientError {
    /// The call payload failed the composed validation schema.
    #[error("[{callee}] Validation error: {method} /{path}: {}", join_violations(.violations))]
    Validation {
        /// Operation that issued the call.
        callee: String,
        /// HTTP method, or `?` when the descriptor had none.
        method: String,
        /// Path with every known placeholder substituted.
        path: String,
        /// Every field-level violation found.
        violations: Vec<Violation>,
    },

    /// Transport-level failure: DNS resolution, connection refused, timeout, etc.
    #[error("[{callee}] Request failed: {method} {url}: {detail}")]
    Request {
        /// Operation that issued the call.
        callee: String,
        /// HTTP method.
        method: String,
        /// Full request URL.
        url: String,
        /// Error details reported by the transport.
        detail: String,
        /// Whether the transport gave up because of a timeout.
        timeout: bool,
    },

    /// The API answered with a status outside `200..=299`.
    #[error("[{callee}] API error: {method} /{path}: {}", describe_api_error(.error_code, .message))]
    Api {
        /// Operation that issued the call.
        callee: String,
        /// HTTP method.
        method: String,
        /// Resolved request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Code of the first entry of the envelope's `errors` array, if any.
        error_code: Option<i64>,
        /// Message of the first entry of the envelope's `errors` array.
        message: String,
    },

    /// The API answered 2xx but the configured result field is absent or empty.
    #[error("[{callee}] API error: {method} /{path}: Response was missing required field ({field})")]
    MissingResultField {
        /// Operation that issued the call.
        callee: String,
        /// HTTP method.
        method: String,
        /// Resolved request path.
        path: String,
        /// Name of the missing field.
        field: String,
    },

    /// Auto-pagination was requested on an endpoint that does not paginate.
    #[error("[{callee}] does not support pagination")]
    PaginationUnsupported {
        /// Operation that issued the call.
        callee: String,
    },

    /// A response body (or result) could not be decoded.
    #[error("[{callee}] Parse error: {detail}")]
    Parse {
        /// Operation that issued the call.
        callee: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// A request body could not be encoded.
    #[error("[{callee}] Serialization error: {detail}")]
    Serialization {
        /// Operation that issued the call.
        callee: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The client configuration is unusable.
    #[error("Configuration error: {detail}")]
    Config {
        /// What is wrong with the configuration.
        detail: String,
    },

    /// No endpoint with this name exists in the catalog.
    #[error("Unknown endpoint: {name}")]
    UnknownEndpoint {
        /// Name that was looked up.
        name: String,
    },
}

impl ClientError {
    /// Whether the request executor retries this error.
    ///
    /// Failures produced by an attempt are all retried with the same policy,
    /// including 4xx API errors.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Request { .. }
                | Self::Api { .. }
                | Self::MissingResultField { .. }
                | Self::Parse { .. }
        )
    }

    /// Whether the error originates from the remote API rather than the transport.
    #[must_use]
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::MissingResultField { .. })
    }

    /// Name of the operation that produced the error, when known.
    #[must_use]
    pub fn callee(&self) -> Option<&str> {
        match self {
            Self::Validation { callee, .. }
            | Self::Request { callee, .. }
            | Self::Api { callee, .. }
            | Self::MissingResultField { callee, .. }
            | Self::PaginationUnsupported { callee }
            | Self::Parse { callee, .. }
            | Self::Serialization { callee, .. } => Some(callee),
            Self::Config { .. } | Self::UnknownEndpoint { .. } => None,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[allow(clippy::ref_option)]
fn describe_api_error(code: &Option<i64>, message: &str) -> String {
    match code {
        Some(code) => format!("{code} - {message}"),
        None => message.to_string(),
    }
}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(error_code: Option<i64>) -> ClientError {
        ClientError::Api {
            callee: "zone_get".to_string(),
            method: "GET".to_string(),
            path: "zones/abc".to_string(),
            status: 403,
            error_code,
            message: "Authentication error".to_string(),
        }
    }

    #[test]
    fn display_api_error_with_code() {
        assert_eq!(
            api_error(Some(10000)).to_string(),
            "[zone_get] API error: GET /zones/abc: 10000 - Authentication error"
        );
    }

    #[test]
    fn display_api_error_without_code() {
        assert_eq!(
            api_error(None).to_string(),
            "[zone_get] API error: GET /zones/abc: Authentication error"
        );
    }

    #[test]
    fn display_missing_result_field() {
        let e = ClientError::MissingResultField {
            callee: "user_get".to_string(),
            method: "GET".to_string(),
            path: "user".to_string(),
            field: "result".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[user_get] API error: GET /user: Response was missing required field (result)"
        );
        assert!(e.is_api_error());
    }

    #[test]
    fn display_validation_lists_every_violation() {
        let e = ClientError::Validation {
            callee: "zone_get".to_string(),
            method: "GET".to_string(),
            path: "zones/abc".to_string(),
            violations: vec![
                Violation::new("params.identifier", "length must be 32 characters long"),
                Violation::new("query.page", "must be greater than or equal to 1"),
            ],
        };
        assert_eq!(
            e.to_string(),
            "[zone_get] Validation error: GET /zones/abc: \
             \"params.identifier\" length must be 32 characters long; \
             \"query.page\" must be greater than or equal to 1"
        );
    }

    #[test]
    fn display_pagination_unsupported() {
        let e = ClientError::PaginationUnsupported {
            callee: "user_get".to_string(),
        };
        assert_eq!(e.to_string(), "[user_get] does not support pagination");
    }

    #[test]
    fn retry_policy_covers_attempt_failures_only() {
        assert!(api_error(Some(1000)).is_retryable());
        assert!(
            ClientError::Request {
                callee: "t".into(),
                method: "GET".into(),
                url: "u".into(),
                detail: "refused".into(),
                timeout: false,
            }
            .is_retryable()
        );
        assert!(
            !ClientError::Validation {
                callee: "t".into(),
                method: "GET".into(),
                path: "p".into(),
                violations: vec![],
            }
            .is_retryable()
        );
        assert!(!ClientError::PaginationUnsupported { callee: "t".into() }.is_retryable());
        assert!(!ClientError::Config { detail: "x".into() }.is_retryable());
    }

    #[test]
    fn callee_is_exposed() {
        assert_eq!(api_error(None).callee(), Some("zone_get"));
        assert_eq!(ClientError::Config { detail: "x".into() }.callee(), None);
    }

    #[test]
    fn serialize_is_tagged_by_code() {
        let json = serde_json::to_string(&api_error(Some(7003))).unwrap();
        assert!(json.contains("\"code\":\"Api\""));
        assert!(json.contains("\"status\":403"));
    }
}
