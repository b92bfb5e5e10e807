use serde_json::Value;

/// Loose truthiness used when interpreting response fields and flags.
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy; everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `value` when truthy, otherwise an empty JSON object.
pub fn or_empty_object(value: Option<Value>) -> Value {
    match value {
        Some(v) if is_truthy(&v) => v,
        _ => Value::Object(serde_json::Map::new()),
    }
}
