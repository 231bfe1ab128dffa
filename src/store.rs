//! Line-delimited JSON record store.
//!
//! The catalogue snapshots are append-only scraper output with a schema that
//! varies per country and per source, so records stay opaque key/value maps
//! and field access goes through ordered alias lists.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// One source record. Schemas differ per origin; fields are looked up by
/// alias at query time.
pub type Record = Map<String, Value>;

/// Parse a line-delimited JSON document into records, preserving file order.
///
/// Blank lines and lines that fail to parse as a JSON object are dropped
/// silently. That is deliberate: a single mangled line in a historical
/// snapshot must not take the whole catalogue offline.
pub fn parse_records(raw: &str) -> Vec<Record> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
        .collect()
}

/// Read a snapshot from disk and parse it. The read itself is the only
/// fallible step; the caller surfaces it as a server error.
pub async fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading record source {}", path.display()))?;
    Ok(parse_records(&raw))
}

/// First key whose value coerces to a non-empty string, trimmed.
pub fn first_string(record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        record
            .get(*key)
            .and_then(value_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// First key present in the record, whatever its value.
pub fn first_value<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| record.get(*key))
}

/// Canonical string form for scalar values. Snapshots mix numeric and string
/// identifiers; both sides of the scholarship join normalize through here.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
