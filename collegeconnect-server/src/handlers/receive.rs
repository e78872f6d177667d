//! Single-record push from CampusFlow.

use serde_json::Value;
use thiserror::Error;

use crate::entities::{Update, UpdatesDocument, MAX_ID};

#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error("No update provided")]
    Missing,

    #[error("new_update must carry a positive integer id no larger than {MAX_ID}")]
    MissingId,

    #[error("invalid new_update: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Decode the pushed record. Absent, `null`, `{}` and other empty values
/// count as "no update".
pub fn decode_pushed(value: Option<Value>) -> Result<Update, ReceiveError> {
    let value = match value {
        None | Some(Value::Null) => return Err(ReceiveError::Missing),
        Some(Value::Object(fields)) if fields.is_empty() => return Err(ReceiveError::Missing),
        Some(Value::String(s)) if s.is_empty() => return Err(ReceiveError::Missing),
        Some(Value::Array(items)) if items.is_empty() => return Err(ReceiveError::Missing),
        Some(value) => value,
    };
    let has_id = value
        .get("id")
        .and_then(Value::as_u64)
        .is_some_and(|id| (1..=MAX_ID).contains(&id));
    if !has_id {
        return Err(ReceiveError::MissingId);
    }
    Ok(serde_json::from_value(value)?)
}

/// Append `update` unless its id is already taken. Returns `true` when the
/// record was appended. Title/content duplicates are not checked.
pub fn accept_pushed(document: &mut UpdatesDocument, update: Update) -> bool {
    if document.contains_id(update.id) {
        return false;
    }
    document.updates.push(update);
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_values_are_missing() {
        for value in [None, Some(Value::Null), Some(json!({})), Some(json!(""))] {
            assert!(matches!(decode_pushed(value), Err(ReceiveError::Missing)));
        }
    }

    #[test]
    fn id_is_required() {
        let err = decode_pushed(Some(json!({"title": "x"}))).unwrap_err();
        assert!(matches!(err, ReceiveError::MissingId));
        let err = decode_pushed(Some(json!({"id": 0, "title": "x"}))).unwrap_err();
        assert!(matches!(err, ReceiveError::MissingId));
        let err = decode_pushed(Some(json!({"id": MAX_ID + 1, "title": "x"}))).unwrap_err();
        assert!(matches!(err, ReceiveError::MissingId));
        assert!(decode_pushed(Some(json!({"id": MAX_ID, "title": "x"}))).is_ok());
    }

    #[test]
    fn pushing_same_id_twice_keeps_one_record() {
        let pushed = json!({
            "id": 40,
            "title": "Guest lecture",
            "content": "Hall B",
            "type": "event",
            "datetime": "2025-10-20T14:00:00",
        });
        let mut doc = UpdatesDocument::default();
        assert!(accept_pushed(&mut doc, decode_pushed(Some(pushed.clone())).unwrap()));
        assert!(!accept_pushed(&mut doc, decode_pushed(Some(pushed)).unwrap()));
        assert_eq!(doc.updates.len(), 1);
        assert_eq!(doc.updates[0].kind, "event");
    }

    #[test]
    fn title_duplicates_with_new_id_are_appended() {
        let mut doc = UpdatesDocument::default();
        for id in [1, 2] {
            let update = decode_pushed(Some(json!({"id": id, "title": "Same"}))).unwrap();
            assert!(accept_pushed(&mut doc, update));
        }
        assert_eq!(doc.updates.len(), 2);
    }
}
