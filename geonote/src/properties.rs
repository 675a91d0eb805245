//! Property-bag cleanup for features coming from drawing tools, imports and
//! exports. Multi-valued fields are collapsed to their first element.

use crate::model::{Properties, Validation};
use serde_json::Value;

/// Collapse every value to a JSON primitive.
///
/// Primitives are kept. A sequence becomes its first element, stringified
/// unless it is already a string or number (an empty sequence becomes null).
/// Anything else is stringified as JSON text.
pub fn sanitize_properties(props: &Properties) -> Properties {
    props.iter().map(|(k, v)| (k.clone(), sanitize_value(v))).collect()
}

fn sanitize_value(v: &Value) -> Value {
    match v {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => v.clone(),
        Value::Array(items) => match items.first() {
            None => Value::Null,
            Some(first @ (Value::String(_) | Value::Number(_))) => first.clone(),
            Some(other) => Value::String(stringify(other)),
        },
        Value::Object(_) => Value::String(stringify(v)),
    }
}

fn stringify(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn first_of(v: &Value) -> Value {
    match v {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    }
}

/// Normalize the properties of a freshly created feature.
///
/// `id`, `name` and `validated` are flattened to their first element when
/// given as a sequence and `validated` defaults to pending. Every other key
/// is copied through unchanged.
// NOTE: flattening only the three well-known keys looks like it papers over
// a specific malformed producer rather than a general rule.
pub fn normalize_new_properties(props: &Properties) -> Properties {
    let mut out = props.clone();
    for key in ["id", "name"] {
        if let Some(v) = props.get(key) {
            out.insert(key.to_string(), first_of(v));
        }
    }
    let validated = match props.get("validated").map(first_of) {
        Some(Value::Null) | None => Value::String(Validation::Pending.as_str().to_string()),
        Some(v) => v,
    };
    out.insert("validated".to_string(), validated);
    out
}

/// Read an id in string form, accepting numbers and single-element sequences.
pub fn id_of(props: &Properties) -> Option<String> {
    match props.get("id").map(first_of)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
