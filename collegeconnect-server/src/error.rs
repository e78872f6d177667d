//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Storage and internal failures are logged and returned with their error
//! text; there is no client this board hides implementation details from.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::entities::StoreError;
use crate::handlers::ingest::IngestError;
use crate::handlers::receive::ReceiveError;
use crate::schemas::sync::SyncResponse;

/// Message returned alongside a 415.
pub const UNSUPPORTED_FORMAT_HINT: &str = "Request must be valid JSON with Content-Type: \
     application/json header or form data";

/// All errors that can occur in the collegeconnect-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The body was neither declared JSON, form data, nor parseable JSON.
    #[error("unsupported request format")]
    UnsupportedFormat,

    /// Propagated from the update store.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServerError::Storage(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client.
    fn client_message(&self) -> String {
        match self {
            ServerError::BadRequest(m) | ServerError::Internal(m) => m.clone(),
            ServerError::UnsupportedFormat => "Invalid request format".to_owned(),
            ServerError::Storage(e) => e.to_string(),
        }
    }

    fn log_if_internal(&self) {
        match self {
            ServerError::Storage(e) => error!(error = %e, "update store error"),
            ServerError::Internal(m) => error!(message = %m, "internal server error"),
            _ => {}
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        self.log_if_internal();
        let status = self.status();
        let body = match &self {
            ServerError::UnsupportedFormat => json!({
                "error": self.client_message(),
                "message": UNSUPPORTED_FORMAT_HINT,
            }),
            _ => json!({ "error": self.client_message() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ServerError {
    fn from(e: IngestError) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}

impl From<ReceiveError> for ServerError {
    fn from(e: ReceiveError) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}

/// Error wrapper for `/api/sync`, which answers failures as
/// `{"status": "error", "message": ...}` instead of `{"error": ...}`.
#[derive(Debug)]
pub struct SyncFailure(pub ServerError);

impl From<ServerError> for SyncFailure {
    fn from(e: ServerError) -> Self {
        SyncFailure(e)
    }
}

impl From<StoreError> for SyncFailure {
    fn from(e: StoreError) -> Self {
        SyncFailure(e.into())
    }
}

impl IntoResponse for SyncFailure {
    fn into_response(self) -> Response {
        let SyncFailure(inner) = self;
        inner.log_if_internal();
        let body = SyncResponse::error(inner.client_message());
        (inner.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_exposes_message() {
        let (status, body) =
            render(ServerError::BadRequest("Title is required".into()).into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title is required");
    }

    #[tokio::test]
    async fn unsupported_format_is_415_with_hint() {
        let (status, body) = render(ServerError::UnsupportedFormat.into_response()).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Invalid request format");
        assert_eq!(body["message"], UNSUPPORTED_FORMAT_HINT);
    }

    #[tokio::test]
    async fn sync_failure_uses_status_message_shape() {
        let failure = SyncFailure(ServerError::BadRequest("No data received".into()));
        let (status, body) = render(failure.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "No data received");
    }
}
