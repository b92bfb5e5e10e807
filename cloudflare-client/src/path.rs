//! Path template resolution
//!
//! Templates use `:name` placeholders (`zones/:zone_identifier/dns_records/:identifier`).
//! Substituted values are inserted verbatim; callers are expected to pass
//! URL-safe identifiers, which the endpoint schemas constrain.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i):([a-z0-9_-]+)\b").unwrap()
});

/// Substitute every `:name` token of `template` with `params[name]`.
///
/// Tokens without a matching key are left untouched, so templates may contain
/// literal colons that are not placeholders.
pub fn resolve_path(template: &str, params: &Map<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => param_to_string(value),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Placeholder names of `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Text form of a path or query value: strings verbatim, everything else as JSON text.
pub(crate) fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
