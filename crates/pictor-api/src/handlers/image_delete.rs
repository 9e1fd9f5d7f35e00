use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::responses::{DeleteResponse, DeleteResult, FailureBody};
use crate::services::ImageFlowError;
use crate::state::AppState;

/// Destroy the asset on the media host, then delete its record.
///
/// The media host's destroy outcome is returned as-is in `deleteResult.destroyResult`; a
/// destroy of an unknown id is not a failure unless the host says so.
#[utoipa::path(
    delete,
    path = "/delete-image/{remote_id}",
    tag = "images",
    params(
        ("remote_id" = String, Path, description = "Remote id assigned by the media host")
    ),
    responses(
        (status = 200, description = "Asset destroyed and record deleted", body = DeleteResponse),
        (status = 500, description = "`{message: \"Failure\", error}` on destroy failure, `{message: \"Image Couldn't be Deleted!\", e}` on delete failure")
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_image"))]
pub async fn delete_image(
    Path(remote_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let deadline = state.request_deadline();

    match state.lifecycle.remove(&remote_id, &deadline).await {
        Ok(outcome) => Json(DeleteResponse {
            message: "Image Deleted Successfully!",
            delete_result: DeleteResult {
                row_count: outcome.rows_affected,
                destroy_result: outcome.destroyed,
            },
        })
        .into_response(),
        Err(e @ ImageFlowError::Store(_)) => {
            FailureBody::e("Image Couldn't be Deleted!", &e).into_server_error()
        }
        Err(e) => FailureBody::error("Failure", &e).into_server_error(),
    }
}
