use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::responses::{RetrieveFailureResponse, RetrieveResponse};
use crate::state::AppState;

/// Fetch the record stored under a remote id.
///
/// A missing record and a store failure are both reported as 401 "could not retrieve record!".
#[utoipa::path(
    get,
    path = "/retrieve-image/{remote_id}",
    tag = "images",
    params(
        ("remote_id" = String, Path, description = "Remote id assigned by the media host")
    ),
    responses(
        (status = 200, description = "Record found", body = RetrieveResponse),
        (status = 401, description = "Record missing or store unavailable", body = RetrieveFailureResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "retrieve_image"))]
pub async fn retrieve_image(
    Path(remote_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let deadline = state.request_deadline();

    match state.lifecycle.retrieve(&remote_id, &deadline).await {
        Ok(record) => Json(RetrieveResponse::from(record)).into_response(),
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(RetrieveFailureResponse::new(&e)),
        )
            .into_response(),
    }
}
