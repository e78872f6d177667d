use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::Update;

/// One submitted notice, before defaults and an id are applied.
///
/// Used both for a single `/add-update` submission and for each element of
/// a batch `updates` list.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub datetime: Option<String>,
}

/// Batch submission body: `{"updates": [UpdateDraft, ...]}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BatchSubmission {
    pub updates: Vec<UpdateDraft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
    Exists,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SingleSubmissionResponse {
    pub status: SubmissionStatus,
    pub update: Update,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchSubmissionResponse {
    pub status: SubmissionStatus,
    pub updates_added: usize,
}
