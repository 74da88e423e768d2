//! Pre-encode value normalization.

use serde_json::{Map, Value};

/// Coerce a JSON value into the codec's model: non-finite numbers become
/// null, containers are normalized element-wise, key order is retained.
///
/// This is the mapping the round-trip law is stated against:
/// `decode(encode(v)) == normalize(v)`.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => Value::Null,
            _ => value.clone(),
        },
        Value::Array(arr) => Value::Array(arr.iter().map(normalize).collect()),
        Value::Object(obj) => {
            let normalized: Map<String, Value> = obj
                .iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect();
            Value::Object(normalized)
        }
        Value::Null | Value::Bool(_) | Value::String(_) => value.clone(),
    }
}
