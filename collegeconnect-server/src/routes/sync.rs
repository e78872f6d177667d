//! Two-way sync endpoints used by CampusFlow.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::error::{ServerError, SyncFailure};
use crate::handlers::receive::{accept_pushed, decode_pushed};
use crate::handlers::reconcile::reconcile;
use crate::schemas::sync::{
    MessageResponse, PeerAlert, PeerAssignment, PeerSnapshot, ReceiveSyncRequest, SyncResponse,
};
use crate::state::AppState;

const NO_DATA: &str = "No data received";

#[derive(OpenApi)]
#[openapi(
    paths(sync_with_campusflow, receive_sync),
    components(schemas(
        PeerAssignment,
        PeerAlert,
        PeerSnapshot,
        SyncResponse,
        ReceiveSyncRequest,
        MessageResponse
    ))
)]
pub struct SyncApi;

/// Register sync routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sync", post(sync_with_campusflow))
        .route("/api/receive-sync", post(receive_sync))
}

/// Merge CampusFlow's assignments and alerts into the board.
#[utoipa::path(
    post,
    path = "/api/sync",
    tag = "sync",
    request_body = PeerSnapshot,
    responses(
        (status = 200, description = "Snapshot merged (possibly with nothing new)", body = SyncResponse),
        (status = 400, description = "No data received", body = SyncResponse),
        (status = 500, description = "Store failure", body = SyncResponse),
    )
)]
pub async fn sync_with_campusflow(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SyncResponse>, SyncFailure> {
    let snapshot = parse_snapshot(&body)?;
    let mut document = state.store.load().await?;

    let added = reconcile(&mut document, snapshot);
    if added == 0 {
        debug!("CampusFlow snapshot contained nothing new");
        return Ok(Json(SyncResponse::success("No new updates to sync")));
    }

    state.store.save(&document).await?;
    info!(added, "merged CampusFlow snapshot");
    Ok(Json(SyncResponse::success("Data synced successfully")))
}

/// Accept one complete record pushed by CampusFlow. Idempotent on `id`.
///
/// The record is stored in the typed shape: a missing `type` or `datetime` is
/// filled in and fields outside the update schema are not kept.
#[utoipa::path(
    post,
    path = "/api/receive-sync",
    tag = "sync",
    request_body = ReceiveSyncRequest,
    responses(
        (status = 200, description = "Stored, or already present", body = MessageResponse),
        (status = 400, description = "No update provided or malformed record"),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn receive_sync(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ServerError> {
    let request = parse_receive(&body)?;
    let update = decode_pushed(request.new_update)?;

    let mut document = state.store.load().await?;
    let (id, title) = (update.id, update.title.clone());
    if !accept_pushed(&mut document, update) {
        debug!(id, "pushed update already stored");
        return Ok(Json(MessageResponse::new("Already exists")));
    }

    state.store.save(&document).await?;
    info!(id, title = %title, "received sync from CampusFlow");
    Ok(Json(MessageResponse::new("Synced successfully")))
}

/// Empty bodies and empty JSON values (`null`, `{}`, `[]`, `""`, `0`,
/// `false`) all mean "no data".
fn parse_snapshot(body: &[u8]) -> Result<PeerSnapshot, ServerError> {
    let no_data = || ServerError::BadRequest(NO_DATA.to_owned());
    let value: Value = serde_json::from_slice(body).map_err(|_| no_data())?;
    if is_empty_value(&value) {
        return Err(no_data());
    }
    serde_json::from_value(value)
        .map_err(|e| ServerError::BadRequest(format!("invalid sync payload: {e}")))
}

fn parse_receive(body: &[u8]) -> Result<ReceiveSyncRequest, ServerError> {
    if body.is_empty() {
        return Ok(ReceiveSyncRequest::default());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ServerError::BadRequest("Invalid JSON in request body".to_owned()))?;
    match value {
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| ServerError::BadRequest(format!("invalid receive payload: {e}"))),
        _ => Ok(ReceiveSyncRequest::default()),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
