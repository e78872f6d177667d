use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;

/// Largest id handed out or accepted: the biggest integer a JSON number keeps
/// exactly on a JavaScript peer (2^53 - 1).
pub const MAX_ID: u64 = 9_007_199_254_740_991;

/// Category used when a stored record carries no `type`.
pub const DEFAULT_STORED_KIND: &str = "general";

/// A single notice on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Update {
    /// Unique within the store; assigned as `max(existing) + 1`.
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Free-form category, e.g. `"general"`, `"assignment"`, `"alert"`.
    #[serde(rename = "type", default = "default_stored_kind")]
    pub kind: String,
    /// ISO-8601 timestamp string, kept verbatim.
    #[serde(default = "now_iso")]
    pub datetime: String,
}

/// The whole store: `{ "updates": [...] }` in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatesDocument {
    #[serde(default)]
    pub updates: Vec<Update>,
}

impl UpdatesDocument {
    /// Decode already-normalized raw records, skipping any that still do not
    /// fit the [`Update`] shape.
    pub fn from_records(records: Vec<Value>) -> Self {
        let updates = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Update>(record) {
                Ok(update) => Some(update),
                Err(e) => {
                    warn!(error = %e, "skipping undecodable update record");
                    None
                }
            })
            .collect();
        Self { updates }
    }

    pub fn max_id(&self) -> u64 {
        self.updates.iter().map(|u| u.id).max().unwrap_or(0)
    }

    /// `max_id() + 1`. Once an id at [`MAX_ID`] is stored, the lowest unused
    /// id is reused instead.
    pub fn next_id(&self) -> u64 {
        let max = self.max_id();
        if max < MAX_ID {
            return max + 1;
        }
        lowest_free_id(&self.updates.iter().map(|u| u.id).collect())
    }

    pub fn contains_id(&self, id: u64) -> bool {
        self.updates.iter().any(|u| u.id == id)
    }

    /// Drop the record with `id`. Returns `false` when nothing matched.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.updates.len();
        self.updates.retain(|u| u.id != id);
        self.updates.len() != before
    }

    /// Records ordered for display: `datetime` descending.
    ///
    /// The comparison is lexicographic on the stored strings, which is only
    /// chronological while every timestamp shares one format.
    pub fn newest_first(&self) -> Vec<&Update> {
        let mut sorted: Vec<&Update> = self.updates.iter().collect();
        sorted.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        sorted
    }
}

/// Current local time as a naive ISO-8601 string with microseconds,
/// e.g. `2025-10-15T09:30:00.123456`.
pub fn now_iso() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Smallest positive id not in `taken`. Some id in `1..=taken.len() + 1` is
/// always free.
pub fn lowest_free_id(taken: &HashSet<u64>) -> u64 {
    (1..=taken.len() as u64 + 1)
        .find(|id| !taken.contains(id))
        .unwrap_or(MAX_ID)
}

fn default_stored_kind() -> String {
    DEFAULT_STORED_KIND.to_owned()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn update(id: u64, datetime: &str) -> Update {
        Update {
            id,
            title: format!("notice {id}"),
            content: String::new(),
            kind: "general".into(),
            datetime: datetime.into(),
        }
    }

    #[test]
    fn serializes_kind_as_type() {
        let value = serde_json::to_value(update(1, "2025-01-01T00:00:00")).unwrap();
        assert_eq!(value["type"], "general");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn next_id_follows_max_not_len() {
        let doc = UpdatesDocument {
            updates: vec![update(2, "a"), update(7, "b")],
        };
        assert_eq!(doc.next_id(), 8);
        assert_eq!(UpdatesDocument::default().next_id(), 1);
    }

    #[test]
    fn next_id_reuses_gaps_once_the_cap_is_taken() {
        let doc = UpdatesDocument {
            updates: vec![update(MAX_ID, "a"), update(1, "b"), update(3, "c")],
        };
        assert_eq!(doc.next_id(), 2);

        let doc = UpdatesDocument {
            updates: vec![update(MAX_ID, "a")],
        };
        assert_eq!(doc.next_id(), 1);
    }

    #[test]
    fn remove_missing_id_leaves_document_untouched() {
        let mut doc = UpdatesDocument {
            updates: vec![update(1, "a"), update(2, "b")],
        };
        let before = doc.clone();
        assert!(!doc.remove(42));
        assert_eq!(doc, before);
        assert!(doc.remove(1));
        assert_eq!(doc.updates.len(), 1);
        assert_eq!(doc.updates[0].id, 2);
    }

    #[test]
    fn newest_first_orders_by_datetime_descending() {
        let doc = UpdatesDocument {
            updates: vec![
                update(1, "2025-01-02T10:00:00"),
                update(2, "2025-03-01T10:00:00"),
                update(3, "2025-02-01T10:00:00"),
            ],
        };
        let ids: Vec<u64> = doc.newest_first().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn from_records_skips_undecodable_entries() {
        let doc = UpdatesDocument::from_records(vec![
            json!({"id": 1, "title": "ok", "content": "", "type": "general", "datetime": "x"}),
            json!({"id": 2, "title": 17}),
        ]);
        assert_eq!(doc.updates.len(), 1);
        assert_eq!(doc.updates[0].title, "ok");
    }

    #[test]
    fn now_iso_has_microsecond_precision() {
        let now = now_iso();
        let (_, fraction) = now.rsplit_once('.').unwrap();
        assert_eq!(fraction.len(), 6);
        assert_eq!(&now[10..11], "T");
    }
}
