//! Typed accessors for raw row fields.
//!
//! Backend values arrive as loose JSON: strings, numbers, arrays of
//! linked-record ids, or attachment objects. These helpers pull a typed
//! value out of a field map, tolerating absent fields and shape drift.

use serde_json::{Map, Value};

/// String field, trimmed. `None` for absent, non-string, or empty values.
pub fn str_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    let s = fields.get(name)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Numeric field. Accepts JSON numbers and numeric strings.
pub fn f64_field(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    match fields.get(name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean field. Checkbox fields are simply absent when unchecked.
pub fn bool_field(fields: &Map<String, Value>, name: &str) -> bool {
    fields
        .get(name)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// String-list field. Accepts a JSON array of strings or a single
/// comma-separated string.
pub fn str_list_field(fields: &Map<String, Value>, name: &str) -> Vec<String> {
    match fields.get(name) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Asset link field. Accepts a plain URL string or an attachment list
/// (`[{ "url": ... }, ...]`), returning the first URL found.
pub fn asset_url_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("url").and_then(Value::as_str))
            .map(|url| url.to_string()),
        _ => None,
    }
}
