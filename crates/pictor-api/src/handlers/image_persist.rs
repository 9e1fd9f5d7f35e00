use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::ImagePayload;
use crate::responses::{FailureBody, PersistResponse};
use crate::services::ImageFlowError;
use crate::state::AppState;

/// Upload an image and record it in the metadata store.
///
/// An insert failure after a successful upload leaves the asset on the media host without a
/// row, unless orphan compensation is enabled.
#[utoipa::path(
    post,
    path = "/persist-image",
    tag = "images",
    request_body(content = Object, description = "`{title, image}` as JSON, form or multipart"),
    responses(
        (status = 201, description = "Image uploaded and persisted", body = PersistResponse),
        (status = 400, description = "Missing title or image", body = ErrorResponse),
        (status = 500, description = "`{message: \"failure\", error}` on upload failure, `{message: \"failure\", e}` on insert failure")
    )
)]
#[tracing::instrument(skip(state, payload), fields(operation = "persist_image"))]
pub async fn persist_image(
    State(state): State<Arc<AppState>>,
    payload: ImagePayload,
) -> Result<Response, HttpAppError> {
    let (title, image) = payload.require_title_and_image()?;
    let deadline = state.request_deadline();

    match state.lifecycle.persist(&title, image, &deadline).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(PersistResponse::from(record))).into_response()),
        Err(e @ ImageFlowError::Store(_)) => Ok(FailureBody::e("failure", &e).into_server_error()),
        Err(e) => Ok(FailureBody::error("failure", &e).into_server_error()),
    }
}
