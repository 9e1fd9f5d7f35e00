use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::ImagePayload;
use crate::responses::{FailureBody, UploadResponse};
use crate::state::AppState;

/// Upload an image to the media host without writing any metadata.
///
/// Lets a client preview what the host stores before committing a record.
#[utoipa::path(
    post,
    path = "/image-upload",
    tag = "images",
    request_body(content = Object, description = "`{image}` as JSON, form or multipart"),
    responses(
        (status = 200, description = "Image uploaded", body = UploadResponse),
        (status = 400, description = "Missing or unreadable image", body = ErrorResponse),
        (status = 500, description = "Upload failed: `{message: \"failure\", error}`")
    )
)]
#[tracing::instrument(skip(state, payload), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    payload: ImagePayload,
) -> Result<Response, HttpAppError> {
    let image = payload.require_image()?;
    let deadline = state.request_deadline();

    match state.lifecycle.upload(image, &deadline).await {
        Ok(asset) => Ok(Json(UploadResponse {
            message: "success",
            result: asset,
        })
        .into_response()),
        Err(e) => Ok(FailureBody::error("failure", &e).into_server_error()),
    }
}
