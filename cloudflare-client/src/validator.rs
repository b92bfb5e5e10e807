//! Schema validation
//!
//! Endpoint definitions describe their inputs with [`FieldRule`]s grouped into
//! [`ObjectSchema`]s, which render to JSON Schema documents. A [`Validator`]
//! checks a payload against such a document and either returns the normalized
//! payload (numeric and boolean strings converted) or every violation it found.

use std::fmt;

use jsonschema::ValidationError;
use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};

// ============ Violations ============

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path of the offending field (`query.per_page`, `body.targets.0`).
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" {}", self.path, self.message)
    }
}

// ============ Rules ============

/// Constraint on a single value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any JSON value.
    Any,
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
        exact_len: Option<usize>,
        /// Allowed values; empty means unrestricted.
        allowed: Vec<String>,
    },
    Number {
        integer: bool,
        min: Option<f64>,
        max: Option<f64>,
        /// Allowed values; empty means unrestricted.
        allowed: Vec<i64>,
    },
    Boolean,
    Array {
        items: Option<Box<FieldRule>>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object(ObjectSchema),
    /// The value must satisfy at least one of the listed rules.
    Alternatives(Vec<FieldRule>),
}

/// A value constraint plus its presence requirement.
///
/// Refinement methods only apply to the matching kind: `max_len` on a number
/// rule is ignored, `max` on a string rule is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    pub fn any() -> Self {
        Self::of(FieldKind::Any)
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String {
            min_len: None,
            max_len: None,
            exact_len: None,
            allowed: Vec::new(),
        })
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number {
            integer: false,
            min: None,
            max: None,
            allowed: Vec::new(),
        })
    }

    /// Whole numbers only.
    pub fn integer() -> Self {
        Self::of(FieldKind::Number {
            integer: true,
            min: None,
            max: None,
            allowed: Vec::new(),
        })
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn array() -> Self {
        Self::of(FieldKind::Array {
            items: None,
            min_items: None,
            max_items: None,
        })
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Self::of(FieldKind::Object(schema))
    }

    pub fn alternatives(rules: impl IntoIterator<Item = FieldRule>) -> Self {
        Self::of(FieldKind::Alternatives(rules.into_iter().collect()))
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn min_len(mut self, len: usize) -> Self {
        if let FieldKind::String { min_len, .. } = &mut self.kind {
            *min_len = Some(len);
        }
        self
    }

    #[must_use]
    pub fn max_len(mut self, len: usize) -> Self {
        if let FieldKind::String { max_len, .. } = &mut self.kind {
            *max_len = Some(len);
        }
        self
    }

    #[must_use]
    pub fn exact_len(mut self, len: usize) -> Self {
        if let FieldKind::String { exact_len, .. } = &mut self.kind {
            *exact_len = Some(len);
        }
        self
    }

    #[must_use]
    pub fn valid<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldKind::String { allowed, .. } = &mut self.kind {
            *allowed = values.into_iter().map(Into::into).collect();
        }
        self
    }

    #[must_use]
    pub fn min(mut self, value: f64) -> Self {
        if let FieldKind::Number { min, .. } = &mut self.kind {
            *min = Some(value);
        }
        self
    }

    #[must_use]
    pub fn max(mut self, value: f64) -> Self {
        if let FieldKind::Number { max, .. } = &mut self.kind {
            *max = Some(value);
        }
        self
    }

    /// Restrict a number rule to an enumerated set of values.
    #[must_use]
    pub fn valid_numbers(mut self, values: impl IntoIterator<Item = i64>) -> Self {
        if let FieldKind::Number { allowed, .. } = &mut self.kind {
            *allowed = values.into_iter().collect();
        }
        self
    }

    #[must_use]
    pub fn items(mut self, rule: FieldRule) -> Self {
        if let FieldKind::Array { items, .. } = &mut self.kind {
            *items = Some(Box::new(rule));
        }
        self
    }

    #[must_use]
    pub fn min_items(mut self, count: usize) -> Self {
        if let FieldKind::Array { min_items, .. } = &mut self.kind {
            *min_items = Some(count);
        }
        self
    }

    #[must_use]
    pub fn max_items(mut self, count: usize) -> Self {
        if let FieldKind::Array { max_items, .. } = &mut self.kind {
            *max_items = Some(count);
        }
        self
    }

    /// JSON Schema for the value (presence is expressed by the parent object).
    ///
    /// Strings without an allowed-value list get `minLength >= 1`: empty
    /// strings count as missing.
    pub fn to_json_schema(&self) -> Value {
        match &self.kind {
            FieldKind::Any => json!({}),
            FieldKind::String {
                min_len,
                max_len,
                exact_len,
                allowed,
            } => {
                let mut schema = Map::new();
                schema.insert("type".into(), "string".into());
                if allowed.is_empty() {
                    let min = exact_len.or(*min_len).unwrap_or(1).max(1);
                    schema.insert("minLength".into(), min.into());
                    if let Some(max) = exact_len.or(*max_len) {
                        schema.insert("maxLength".into(), max.into());
                    }
                } else {
                    schema.insert("enum".into(), allowed.clone().into());
                }
                Value::Object(schema)
            }
            FieldKind::Number {
                integer,
                min,
                max,
                allowed,
            } => {
                let mut schema = Map::new();
                let kind = if *integer { "integer" } else { "number" };
                schema.insert("type".into(), kind.into());
                if let Some(min) = min.and_then(Number::from_f64) {
                    schema.insert("minimum".into(), Value::Number(min));
                }
                if let Some(max) = max.and_then(Number::from_f64) {
                    schema.insert("maximum".into(), Value::Number(max));
                }
                if !allowed.is_empty() {
                    schema.insert("enum".into(), allowed.clone().into());
                }
                Value::Object(schema)
            }
            FieldKind::Boolean => json!({"type": "boolean"}),
            FieldKind::Array {
                items,
                min_items,
                max_items,
            } => {
                let mut schema = Map::new();
                schema.insert("type".into(), "array".into());
                if let Some(items) = items {
                    schema.insert("items".into(), items.to_json_schema());
                }
                if let Some(min) = min_items {
                    schema.insert("minItems".into(), (*min).into());
                }
                if let Some(max) = max_items {
                    schema.insert("maxItems".into(), (*max).into());
                }
                Value::Object(schema)
            }
            FieldKind::Object(schema) => schema.to_json_schema(),
            FieldKind::Alternatives(rules) => {
                json!({"anyOf": rules.iter().map(Self::to_json_schema).collect::<Vec<_>>()})
            }
        }
    }
}

/// Ordered set of named field rules describing a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<(String, FieldRule)>,
    allow_unknown: bool,
    min_keys: Option<usize>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for `name`.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(name.into(), rule);
        self
    }

    /// Accept keys that have no rule, passing them through unchanged.
    #[must_use]
    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    #[must_use]
    pub fn min_keys(mut self, count: usize) -> Self {
        self.min_keys = Some(count);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find_map(|(key, rule)| (key == name).then_some(rule))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// New schema with `self`'s rules layered over `base`'s; `self` wins on conflicts.
    #[must_use]
    pub fn layered_over(&self, base: &Self) -> Self {
        let mut merged = base.clone();
        for (name, rule) in &self.fields {
            merged.insert(name.clone(), rule.clone());
        }
        merged.allow_unknown = self.allow_unknown || base.allow_unknown;
        merged.min_keys = self.min_keys.or(base.min_keys);
        merged
    }

    fn insert(&mut self, name: String, rule: FieldRule) {
        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = rule;
        } else {
            self.fields.push((name, rule));
        }
    }

    /// JSON Schema object document: `properties`, `required` and, unless
    /// unknown keys are allowed, `additionalProperties: false`.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, rule)| (name.clone(), rule.to_json_schema()))
            .collect();
        let required: Vec<Value> = self
            .fields
            .iter()
            .filter(|(_, rule)| rule.required)
            .map(|(name, _)| Value::String(name.clone()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".into(), "object".into());
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        if !self.allow_unknown {
            schema.insert("additionalProperties".into(), Value::Bool(false));
        }
        if let Some(min) = self.min_keys {
            schema.insert("minProperties".into(), min.into());
        }
        Value::Object(schema)
    }
}

// ============ Validator ============

/// Schema validation capability.
///
/// `schema` is a JSON Schema document. Returns the normalized payload on
/// success and the complete list of violations, ordered by path, on failure.
pub trait Validator: Send + Sync {
    fn validate(&self, schema: &Value, payload: &Value) -> Result<Value, Vec<Violation>>;
}

/// Built-in [`Validator`] backed by `jsonschema`.
///
/// Numeric and boolean strings are converted where the schema expects a
/// number or boolean before the document is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl Validator for SchemaValidator {
    fn validate(&self, schema: &Value, payload: &Value) -> Result<Value, Vec<Violation>> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| vec![Violation::new("schema", format!("is invalid: {e}"))])?;

        let normalized = coerce(schema, payload);
        let mut violations: Vec<Violation> = validator
            .iter_errors(&normalized)
            .flat_map(|error| violations_of(&error, schema))
            .collect();

        if violations.is_empty() {
            Ok(normalized)
        } else {
            violations.sort_by(|a, b| a.path.cmp(&b.path));
            Err(violations)
        }
    }
}

// ============ Coercion ============

fn coerce(schema: &Value, value: &Value) -> Value {
    if let Some(candidates) = schema.get("anyOf").and_then(Value::as_array) {
        return candidates
            .iter()
            .map(|candidate| (candidate, coerce(candidate, value)))
            .find(|(candidate, coerced)| accepts(candidate, coerced))
            .map_or_else(|| value.clone(), |(_, coerced)| coerced);
    }

    let kind = schema.get("type").and_then(Value::as_str);
    match value {
        Value::String(s) => match kind {
            Some("number" | "integer") => parse_number(s.trim()).unwrap_or_else(|| value.clone()),
            Some("boolean") if s == "true" => Value::Bool(true),
            Some("boolean") if s == "false" => Value::Bool(false),
            _ => value.clone(),
        },
        Value::Number(n) if kind == Some("integer") => {
            whole_number(n).map_or_else(|| value.clone(), Value::Number)
        }
        Value::Object(map) => {
            let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
                return value.clone();
            };
            Value::Object(
                map.iter()
                    .map(|(key, field)| {
                        let coerced = properties
                            .get(key)
                            .map_or_else(|| field.clone(), |rule| coerce(rule, field));
                        (key.clone(), coerced)
                    })
                    .collect(),
            )
        }
        Value::Array(elements) => match schema.get("items") {
            Some(item) => Value::Array(elements.iter().map(|e| coerce(item, e)).collect()),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

fn accepts(schema: &Value, value: &Value) -> bool {
    jsonschema::validator_for(schema).is_ok_and(|validator| validator.is_valid(value))
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(|n| Value::Number(whole_number(&n).unwrap_or(n)))
}

/// `2.0` as `2`, so integral values read back through `as_u64`/`as_i64`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn whole_number(n: &Number) -> Option<Number> {
    if n.is_i64() || n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    let whole = f as i64;
    (whole as f64 == f).then(|| Number::from(whole))
}

// ============ Error mapping ============

fn violations_of(error: &ValidationError<'_>, schema: &Value) -> Vec<Violation> {
    let segments = pointer_segments(&error.instance_path.to_string());
    let path = segments.join(".");
    let rule = subschema(schema, &segments);
    let limit = |key: &str| {
        rule.and_then(|r| r.get(key))
            .and_then(Value::as_f64)
            .map(|n| n.to_string())
            .unwrap_or_default()
    };

    let message = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map_or_else(|| property.to_string(), ToString::to_string);
            return vec![Violation::new(join_path(&path, &name), "is required")];
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            return unexpected
                .iter()
                .map(|key| Violation::new(join_path(&path, key), "is not allowed"))
                .collect();
        }
        ValidationErrorKind::Type { .. } => {
            let expected = rule
                .and_then(|r| r.get("type"))
                .and_then(Value::as_str)
                .unwrap_or("valid");
            format!("must be {}", with_article(expected))
        }
        ValidationErrorKind::Enum { .. } => {
            let options: Vec<String> = rule
                .and_then(|r| r.get("enum"))
                .and_then(Value::as_array)
                .map(|values| values.iter().map(plain_text).collect())
                .unwrap_or_default();
            format!("must be one of [{}]", options.join(", "))
        }
        ValidationErrorKind::MinLength { .. } => {
            if exact_length(rule) {
                format!("length must be {} characters long", limit("minLength"))
            } else if limit("minLength") == "1" {
                "is not allowed to be empty".to_string()
            } else {
                format!("length must be at least {} characters long", limit("minLength"))
            }
        }
        ValidationErrorKind::MaxLength { .. } => {
            if exact_length(rule) {
                format!("length must be {} characters long", limit("maxLength"))
            } else {
                format!(
                    "length must be less than or equal to {} characters long",
                    limit("maxLength")
                )
            }
        }
        ValidationErrorKind::Minimum { .. } => {
            format!("must be greater than or equal to {}", limit("minimum"))
        }
        ValidationErrorKind::Maximum { .. } => {
            format!("must be less than or equal to {}", limit("maximum"))
        }
        ValidationErrorKind::MinItems { .. } => {
            format!("must contain at least {} items", limit("minItems"))
        }
        ValidationErrorKind::MaxItems { .. } => {
            format!("must contain less than or equal to {} items", limit("maxItems"))
        }
        ValidationErrorKind::MinProperties { .. } => {
            let min = limit("minProperties");
            let noun = if min == "1" { "key" } else { "keys" };
            format!("must have at least {min} {noun}")
        }
        ValidationErrorKind::AnyOf { .. } => "does not match any of the allowed types".to_string(),
        _ => error.to_string(),
    };

    let path = if path.is_empty() { "value".to_string() } else { path };
    vec![Violation::new(path, message)]
}

/// Segments of a JSON pointer (`/body/targets/0` -> `body`, `targets`, `0`).
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Schema node describing the value at `segments`.
fn subschema<'a>(schema: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(schema, |node, segment| {
        node.get("properties")
            .and_then(|properties| properties.get(segment))
            .or_else(|| node.get("items"))
    })
}

fn exact_length(rule: Option<&Value>) -> bool {
    rule.is_some_and(|r| r.get("minLength").is_some() && r.get("minLength") == r.get("maxLength"))
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn with_article(kind: &str) -> String {
    match kind.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => format!("an {kind}"),
        _ => format!("a {kind}"),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
