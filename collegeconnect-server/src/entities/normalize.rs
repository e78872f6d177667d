//! Load-time schema repair for records written by older versions of the
//! board (or edited by hand).
//!
//! Rules, applied to each raw record in order:
//! - a legacy `description` moves to `content` unless `content` is present
//! - non-string `title` / `content` / `type` / `datetime` values are
//!   rewritten as their JSON text, e.g. `101` → `"101"`
//! - a missing or empty `type` becomes `"general"`
//! - a missing `datetime` becomes the supplied timestamp
//! - a missing, non-positive, non-integer, oversized or repeated `id` is
//!   replaced by the running maximum + 1 (the lowest free id once that would
//!   pass [`MAX_ID`])
//! - missing `title` / `content` become `""`
//!
//! Entries that are not JSON objects are dropped.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::warn;

use super::update::{lowest_free_id, DEFAULT_STORED_KIND, MAX_ID};

const TEXT_FIELDS: [&str; 4] = ["title", "content", "type", "datetime"];

/// Repair `records` in place. Returns `true` if anything was modified.
pub fn normalize_records(records: &mut Vec<Value>, now: &str) -> bool {
    let before = records.len();
    records.retain(Value::is_object);
    let mut changed = records.len() != before;
    if changed {
        warn!(dropped = before - records.len(), "dropping non-object update records");
    }

    let mut taken: HashSet<u64> = records
        .iter()
        .filter_map(|r| valid_id(r.get("id")))
        .collect();
    let mut max_id = taken.iter().copied().max().unwrap_or(0);
    let mut seen = HashSet::new();

    for record in records.iter_mut() {
        let Value::Object(fields) = record else {
            continue;
        };
        changed |= migrate_description(fields);
        changed |= stringify_text_fields(fields);
        changed |= backfill_kind(fields);
        changed |= backfill_string(fields, "datetime", now);
        changed |= backfill_string(fields, "title", "");
        changed |= backfill_string(fields, "content", "");

        match valid_id(fields.get("id")) {
            Some(id) if seen.insert(id) => {}
            _ => {
                let id = if max_id < MAX_ID {
                    max_id += 1;
                    max_id
                } else {
                    lowest_free_id(&taken)
                };
                fields.insert("id".to_owned(), Value::from(id));
                seen.insert(id);
                taken.insert(id);
                changed = true;
            }
        }
    }
    changed
}

fn valid_id(value: Option<&Value>) -> Option<u64> {
    value
        .and_then(Value::as_u64)
        .filter(|id| (1..=MAX_ID).contains(id))
}

fn migrate_description(fields: &mut Map<String, Value>) -> bool {
    if fields.contains_key("content") {
        return false;
    }
    match fields.remove("description") {
        Some(description) => {
            fields.insert("content".to_owned(), description);
            true
        }
        None => false,
    }
}

fn stringify_text_fields(fields: &mut Map<String, Value>) -> bool {
    let mut changed = false;
    for key in TEXT_FIELDS {
        if let Some(value) = fields.get_mut(key) {
            if !matches!(value, Value::String(_) | Value::Null) {
                warn!(field = key, value = %value, "rewriting non-string field as text");
                *value = Value::String(value.to_string());
                changed = true;
            }
        }
    }
    changed
}

fn backfill_kind(fields: &mut Map<String, Value>) -> bool {
    let missing = match fields.get("type") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if missing {
        fields.insert("type".to_owned(), Value::from(DEFAULT_STORED_KIND));
    }
    missing
}

fn backfill_string(fields: &mut Map<String, Value>, key: &str, default: &str) -> bool {
    match fields.get(key) {
        None | Some(Value::Null) => {
            fields.insert(key.to_owned(), Value::from(default));
            true
        }
        Some(_) => false,
    }
}
