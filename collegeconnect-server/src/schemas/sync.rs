use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// An assignment as CampusFlow reports it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PeerAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

/// An alert as CampusFlow reports it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PeerAlert {
    pub title: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

/// Bulk payload pushed to `/api/sync`. Both lists are optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PeerSnapshot {
    #[serde(default)]
    pub assignments: Option<Vec<PeerAssignment>>,
    #[serde(default)]
    pub alerts: Option<Vec<PeerAlert>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SyncResponse {
    pub status: String,
    pub message: String,
}

impl SyncResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_owned(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_owned(),
            message: message.into(),
        }
    }
}

/// Body of `/api/receive-sync`. `new_update` must be a complete record,
/// including its `id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReceiveSyncRequest {
    #[serde(default)]
    pub new_update: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
