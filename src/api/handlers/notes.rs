//! Note handlers.
//!
//! Bodies are plain text in both directions: a POST carries the note body
//! and answers with the new uuid, a GET answers with the stored body.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::api::AppState;
use crate::store::{Note, StoreError, Storer};

type HandlerError = (StatusCode, String);

fn internal_error(e: StoreError) -> HandlerError {
    error!("{}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
    )
}

#[utoipa::path(
    get,
    path = "/",
    tag = "notes",
    responses(
        (status = 200, description = "Usage hint", body = String, content_type = "text/plain")
    )
)]
#[instrument]
pub async fn index() -> &'static str {
    "POST a note"
}

#[utoipa::path(
    post,
    path = "/",
    tag = "notes",
    request_body(content = String, content_type = "text/plain", description = "Note body"),
    responses(
        (status = 200, description = "Note created, body is its uuid", body = String, content_type = "text/plain"),
        (status = 422, description = "Empty note", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = String, content_type = "text/plain")
    )
)]
#[instrument(skip(state, body))]
pub async fn create_note<S: Storer>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<String, HandlerError> {
    if body.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid empty note".to_string(),
        ));
    }

    let uuid = Uuid::new_v4().to_string();
    // Invalid UTF-8 is stored with replacement characters, not rejected.
    let note = Note::new(uuid.clone(), String::from_utf8_lossy(&body));

    state.store().create(&note).await.map_err(internal_error)?;

    info!(%uuid, "note created");
    debug!(%uuid, body = %note.body, "note body");

    Ok(uuid)
}

#[utoipa::path(
    get,
    path = "/{note_id}",
    tag = "notes",
    params(("note_id" = String, Path, description = "Note uuid")),
    responses(
        (status = 200, description = "Note body", body = String, content_type = "text/plain"),
        (status = 404, description = "Note not found"),
        (status = 422, description = "Missing note id", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = String, content_type = "text/plain")
    )
)]
#[instrument(skip(state))]
pub async fn get_note<S: Storer>(
    State(state): State<AppState<S>>,
    Path(note_id): Path<String>,
) -> Result<String, HandlerError> {
    if note_id.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "note_id required".to_string(),
        ));
    }

    let note = state.store().get(&note_id).await.map_err(|e| match e {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, String::new()),
        e => internal_error(e),
    })?;

    Ok(note.body)
}
