//! Best-effort JSON and line-delimited JSON reading.

use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Parse a file as a single JSON document.
///
/// Returns `None` on any read or parse failure.
pub fn read_json(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Parse up to `max_lines` lines of a line-delimited JSON file.
///
/// Malformed lines are skipped rather than aborting the read; a missing or
/// unreadable file yields an empty list.
pub fn read_jsonl(path: &Path, max_lines: usize) -> Vec<Value> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return Vec::new(),
    };

    BufReader::new(file)
        .lines()
        .take(max_lines)
        .filter_map(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect()
}

/// Extract the first present non-empty string field among `keys` from a JSON
/// object.
pub fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    let object = value.as_object()?;
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(|v| v.as_str())
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Extract a timestamp field among `keys`, accepting either epoch
/// milliseconds (number) or an RFC 3339 string.
pub fn timestamp_field(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    let object = value.as_object()?;
    for key in keys {
        match object.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(ms) = n.as_i64()
                    && let Some(ts) = DateTime::<Utc>::from_timestamp_millis(ms)
                {
                    return Some(ts);
                }
            }
            Some(Value::String(s)) => {
                if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                    return Some(ts.with_timezone(&Utc));
                }
            }
            _ => {}
        }
    }
    None
}
