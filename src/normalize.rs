//! Turns loosely typed list fields into ordered lists of strings.
//!
//! Recipe documents store `ingredients` and `instructions` in whatever shape
//! the writer picked: a real array, a JSON-encoded array inside a string, or a
//! plain comma-separated string. Readers only ever see `Vec<String>`.

use log::trace;
use serde_json::Value;

/// Normalize a field that should hold a list of strings.
///
/// - arrays are kept as they are, in order
/// - strings are parsed as JSON first; a JSON array wins
/// - any other string is split on commas, trimmed, with empty pieces dropped
/// - everything else (missing, null, numbers, objects) yields an empty list
pub fn normalize_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(element_to_string).collect(),
        Some(Value::String(text)) => normalize_str(text),
        _ => Vec::new(),
    }
}

/// Normalize a string that may contain a JSON array or a comma-separated list.
pub fn normalize_str(text: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => return items.iter().map(element_to_string).collect(),
        Ok(_) => trace!("list field is JSON but not an array, splitting on commas"),
        Err(e) => trace!("list field is not JSON ({}), splitting on commas", e),
    }

    split_commas(text)
}

fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

// Non-string scalars keep their JSON text so element count and order never change.
fn element_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
