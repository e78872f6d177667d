//! Manual and batch submission of updates.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::entities::{now_iso, Update, UpdatesDocument};
use crate::handlers::dedup::find_duplicate;
use crate::schemas::updates::{BatchSubmission, UpdateDraft};

/// Category applied to submitted notices that do not name one.
pub const DEFAULT_SUBMITTED_KIND: &str = "General";
const UNTITLED: &str = "Untitled";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Title is required")]
    MissingTitle,

    #[error("invalid update payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// What a submitted payload asks for.
#[derive(Debug)]
pub enum Submission {
    /// `{"updates": [...]}`: append everything, no deduplication.
    Batch(Vec<UpdateDraft>),
    /// Any other object: one notice.
    Single(UpdateDraft),
}

impl Submission {
    /// A payload whose `updates` field is a list is a batch; anything else is
    /// read as a single draft.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, IngestError> {
        let is_batch = matches!(fields.get("updates"), Some(Value::Array(_)));
        let payload = Value::Object(fields);
        if is_batch {
            let batch: BatchSubmission = serde_json::from_value(payload)?;
            Ok(Self::Batch(batch.updates))
        } else {
            Ok(Self::Single(serde_json::from_value(payload)?))
        }
    }
}

/// Result of a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleOutcome {
    /// A new record was appended.
    Created(Update),
    /// An equivalent record was already stored; nothing changed.
    Existing(Update),
}

/// Append every draft with defaults and fresh ids. Returns the count added.
pub fn append_batch(document: &mut UpdatesDocument, drafts: Vec<UpdateDraft>) -> usize {
    let added = drafts.len();
    for draft in drafts {
        let id = document.next_id();
        document.updates.push(Update {
            id,
            title: draft.title.unwrap_or_else(|| UNTITLED.to_owned()),
            content: draft.content.unwrap_or_default(),
            kind: draft.kind.unwrap_or_else(|| DEFAULT_SUBMITTED_KIND.to_owned()),
            datetime: draft.datetime.unwrap_or_else(now_iso),
        });
    }
    added
}

/// Add one notice unless an equivalent one is already on the board.
pub fn submit_single(
    document: &mut UpdatesDocument,
    draft: UpdateDraft,
) -> Result<SingleOutcome, IngestError> {
    let title = draft
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(IngestError::MissingTitle)?
        .to_owned();
    let content = draft.content.as_deref().unwrap_or_default().trim().to_owned();

    if let Some(existing) = find_duplicate(document, &title, &content) {
        return Ok(SingleOutcome::Existing(existing.clone()));
    }

    let kind = draft
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_SUBMITTED_KIND)
        .to_owned();
    let datetime = draft
        .datetime
        .filter(|d| !d.is_empty())
        .unwrap_or_else(now_iso);

    let update = Update {
        id: document.next_id(),
        title,
        content,
        kind,
        datetime,
    };
    document.updates.push(update.clone());
    Ok(SingleOutcome::Created(update))
}
