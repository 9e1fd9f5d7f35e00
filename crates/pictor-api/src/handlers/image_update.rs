use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::ImagePayload;
use crate::responses::{FailureBody, UpdateMessage, UpdateResponse, STATUS_SUCCESS};
use crate::services::ImageFlowError;
use crate::state::AppState;

/// Replace the image stored under a remote id.
///
/// The old asset is destroyed before the new one is uploaded; an upload failure at that point
/// leaves the record pointing at the destroyed asset.
#[utoipa::path(
    put,
    path = "/update-image/{remote_id}",
    tag = "images",
    params(
        ("remote_id" = String, Path, description = "Remote id assigned by the media host")
    ),
    request_body(content = Object, description = "`{title, image}` as JSON, form or multipart"),
    responses(
        (status = 201, description = "Image replaced", body = UpdateResponse),
        (status = 400, description = "Missing title or image", body = ErrorResponse),
        (status = 500, description = "`{message: \"failed\", error}` on destroy failure, `{message: \"failed\", err}` on upload failure, `{message: \"Update Failed\", e}` on update failure")
    )
)]
#[tracing::instrument(skip(state, payload), fields(operation = "update_image"))]
pub async fn update_image(
    Path(remote_id): Path<String>,
    State(state): State<Arc<AppState>>,
    payload: ImagePayload,
) -> Result<Response, HttpAppError> {
    let (title, image) = payload.require_title_and_image()?;
    let deadline = state.request_deadline();

    let response = match state
        .lifecycle
        .replace(&remote_id, &title, image, &deadline)
        .await
    {
        Ok(_) => (
            StatusCode::CREATED,
            Json(UpdateResponse {
                status: STATUS_SUCCESS,
                data: UpdateMessage {
                    message: "Image Updated Successfully",
                },
            }),
        )
            .into_response(),
        Err(e @ ImageFlowError::Destroy(_)) => FailureBody::error("failed", &e).into_server_error(),
        Err(e @ ImageFlowError::Upload(_)) => FailureBody::err("failed", &e).into_server_error(),
        Err(e) => FailureBody::e("Update Failed", &e).into_server_error(),
    };

    Ok(response)
}
