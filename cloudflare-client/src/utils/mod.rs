//! Utility modules.

/// JSON value helpers shared by the pipeline stages.
pub mod json;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
