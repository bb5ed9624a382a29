//! Value helpers for loosely-typed record fields.
//!
//! Records arrive as arbitrary JSON objects, so every field is a
//! [`serde_json::Value`]. The helpers here define the shared vocabulary the
//! engine relies on:
//!
//! - **blank**: `null`, `false`, numeric zero, or an empty/whitespace-only string
//! - **strict equality**: JSON equality where numbers compare by value
//! - **ordering**: string-form order within a type, type rank across types
//! - **display string**: the textual form used for joins and pattern tests

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// A single input or output record.
pub type Record = Map<String, Value>;

/// Returns true if the value carries no usable data.
///
/// Arrays and objects are never blank, even when empty.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Returns true for `null`, `false`, numeric zero, and the empty string.
///
/// Unlike [`is_blank`], whitespace-only strings are not missing.
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Look up a field, treating absent fields as `null`.
pub fn field_value(record: &Record, field: &str) -> Value {
    record.get(field).cloned().unwrap_or(Value::Null)
}

/// Strict equality between two values.
///
/// Numbers compare by numeric value so that `1` and `1.0` are equal; strings
/// never equal numbers.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| strict_equals(l, r))
        }
        _ => a == b,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order used by sorting reducers.
///
/// Scalars of the same type compare by their display string in code-unit
/// order, so `10` sorts before `9`. Arrays compare element-wise. Mixed types
/// order by type rank: null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(_), Value::Bool(_))
        | (Value::Number(_), Value::Number(_))
        | (Value::Object(_), Value::Object(_)) => display_string(a).cmp(&display_string(b)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(l, r)| compare_values(l, r))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Textual form of a value, used when joining values or matching them
/// against a pattern.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn format_number(number: &serde_json::Number) -> String {
    if number.is_f64() {
        if let Some(f) = number.as_f64() {
            // Integral floats print without a fractional part ("3", not "3.0").
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{f:.0}");
            }
        }
    }
    number.to_string()
}

/// Canonical key used to bucket primary-key values.
///
/// The key keeps the JSON type, so `1` and `"1"` land in different groups,
/// while `1` and `1.0` share one.
pub fn group_key(value: &Value) -> String {
    match value {
        Value::String(s) => format!("s:{s}"),
        Value::Number(n) => format!("n:{}", format_number(n)),
        other => format!("j:{other}"),
    }
}
