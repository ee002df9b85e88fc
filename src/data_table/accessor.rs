//! Field Accessor
//!
//! Resolves dotted paths against schema-less rows.

use serde_json::{Map, Value};

/// One record of the table. Fields may nest objects or arrays.
pub type Row = Map<String, Value>;

/// Resolve `path` (e.g. `"customer.name"`) against a row.
///
/// Returns `None` when the path is absent, when any segment is missing, or
/// when the value (or an intermediate value) is `null`. `false`, `0` and `""`
/// are present values. Array segments are addressed by decimal index.
pub fn get_path<'a>(row: &'a Row, path: Option<&str>) -> Option<&'a Value> {
    let path = path?;
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = row.get(first)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    if current.is_null() { None } else { Some(current) }
}

/// String form of a present value, used for matching and lexical ordering.
///
/// Integral floats print without a fractional part (`850.0` → `"850"`), arrays
/// join their elements with `,` and objects print as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Truthiness of a present value: `false`, `0`, `NaN` and `""` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
