//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use pictor_core::{Deadline, DeadlineError};
use std::sync::Arc;
use std::time::Duration;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the metadata store answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let deadline = Deadline::after(READINESS_TIMEOUT).with_cancellation(state.shutdown.clone());

    let database = match state.metadata.ping(&deadline).await {
        Ok(()) => "ready".to_string(),
        Err(pictor_core::AppError::Interrupted(DeadlineError::Elapsed(_))) => {
            tracing::error!("Database readiness check timed out");
            "timeout".to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "Database readiness check failed");
            format!("not_ready: {}", e)
        }
    };

    let ready = database == "ready";
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "database": database,
            "media_backend": state.backend.to_string(),
        })),
    )
}
