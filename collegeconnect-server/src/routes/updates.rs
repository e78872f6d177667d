//! Listing, submission and deletion of updates.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, info, warn};
use utoipa::OpenApi;

use crate::entities::Update;
use crate::error::ServerError;
use crate::handlers::ingest::{append_batch, submit_single, SingleOutcome, Submission};
use crate::routes::payload::SubmittedPayload;
use crate::schemas::updates::{
    BatchSubmissionResponse, SingleSubmissionResponse, SubmissionStatus, UpdateDraft,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_updates, add_update, delete_update),
    components(schemas(
        Update,
        UpdateDraft,
        SubmissionStatus,
        SingleSubmissionResponse,
        BatchSubmissionResponse
    ))
)]
pub struct UpdatesApi;

/// Register update routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/updates", get(list_updates))
        .route("/add-update", post(add_update))
        .route("/delete-update/{id}", post(delete_update))
}

#[utoipa::path(
    get,
    path = "/updates",
    tag = "updates",
    responses(
        (status = 200, description = "Every stored update in insertion order", body = Vec<Update>),
        (status = 500, description = "Store unreadable"),
    )
)]
pub async fn list_updates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Update>>, ServerError> {
    let document = state.store.load().await?;
    Ok(Json(document.updates))
}

/// Create one update (deduplicated) or append a batch (`{"updates": [...]}`).
///
/// Form posts are answered with a redirect to the listing page.
#[utoipa::path(
    post,
    path = "/add-update",
    tag = "updates",
    request_body = UpdateDraft,
    responses(
        (status = 200, description = "Update created, already present, or batch appended", body = SingleSubmissionResponse),
        (status = 303, description = "Form submission handled; redirect to /"),
        (status = 400, description = "Invalid JSON, empty body, or missing title"),
        (status = 415, description = "Body is neither JSON nor form data"),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn add_update(
    State(state): State<Arc<AppState>>,
    payload: SubmittedPayload,
) -> Result<Response, ServerError> {
    let from_form = payload.is_form();
    let submission = Submission::from_fields(payload.into_fields())?;
    let mut document = state.store.load().await?;

    let outcome = match submission {
        Submission::Batch(drafts) => {
            let added = append_batch(&mut document, drafts);
            state.store.save(&document).await?;
            info!(added, "batch of updates stored");
            if from_form {
                return Ok(back_to_board());
            }
            return Ok(Json(BatchSubmissionResponse {
                status: SubmissionStatus::Success,
                updates_added: added,
            })
            .into_response());
        }
        Submission::Single(draft) => submit_single(&mut document, draft)?,
    };

    let (status, update) = match outcome {
        SingleOutcome::Existing(update) => {
            debug!(id = update.id, "equivalent update already stored");
            (SubmissionStatus::Exists, update)
        }
        SingleOutcome::Created(update) => {
            state.store.save(&document).await?;
            info!(id = update.id, title = %update.title, "update stored");
            forward_to_peer(&state, &update).await;
            (SubmissionStatus::Success, update)
        }
    };

    if from_form {
        return Ok(back_to_board());
    }
    Ok(Json(SingleSubmissionResponse { status, update }).into_response())
}

#[utoipa::path(
    post,
    path = "/delete-update/{id}",
    tag = "updates",
    params(("id" = u64, Path, description = "Id of the update to remove")),
    responses(
        (status = 303, description = "Removed (or absent); redirect to /"),
    )
)]
pub async fn delete_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Redirect, ServerError> {
    let mut document = state.store.load().await?;
    if document.remove(id) {
        state.store.save(&document).await?;
        info!(id, "update deleted");
    } else {
        debug!(id, "delete requested for unknown update");
    }
    Ok(Redirect::to("/"))
}

fn back_to_board() -> Response {
    Redirect::to("/").into_response()
}

/// Tell CampusFlow about a freshly stored update. Failures are logged only;
/// the local write stands either way.
async fn forward_to_peer(state: &AppState, update: &Update) {
    match state.notifier.notify_created(update).await {
        Ok(()) => info!(title = %update.title, "synced update with CampusFlow"),
        Err(e) => warn!(id = update.id, error = %e, "CampusFlow sync failed"),
    }
}
