//! Safe field access over loosely-structured request records
//!
//! Request records and conversation messages come back from the commerce
//! platform as raw JSON with no schema guarantees. The accessors here never
//! fail: a missing key anywhere along the path yields an empty-string
//! sentinel so that absent fields flow through row building as blanks.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// The empty-string sentinel used for absent fields
fn empty() -> Value {
    Value::String(String::new())
}

/// Follow `path` through a nested record.
///
/// Returns the empty-string sentinel when a key is absent, when keys remain
/// but the current node is no longer an object, or when the terminal value
/// is an object, `null` or an empty array. A terminal scalar (or non-empty
/// array) is returned as-is.
pub fn path_value(record: &Value, path: &[&str]) -> Value {
    let mut current = record;

    for key in path {
        let Some(map) = current.as_object() else {
            return empty();
        };
        match map.get(*key) {
            Some(next) => current = next,
            None => return empty(),
        }
    }

    match current {
        Value::Object(_) | Value::Null => empty(),
        Value::Array(items) if items.is_empty() => empty(),
        other => other.clone(),
    }
}

/// Follow `path` and project the result to a display string.
///
/// Strings are returned verbatim; numbers and booleans are formatted;
/// everything else becomes the empty string.
pub fn path_str(record: &Value, path: &[&str]) -> String {
    match path_value(record, path) {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse a creation timestamp as reported by the commerce platform.
///
/// `""` and `"-"` mark absent timestamps. Both full ISO-8601 offsets
/// (`2026-08-01T10:00:00+00:00`) and bare UTC datetimes are accepted.
pub fn parse_created(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() || value == "-" {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a parsed creation timestamp for the report, `-` when absent
pub fn format_created(created: Option<DateTime<Utc>>) -> String {
    match created {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
