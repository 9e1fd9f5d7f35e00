//! Route configuration and setup.
//!
//! Image routes live in [image_routes]; health checks in [health](health).

mod health;

use crate::handlers::{
    image_delete::delete_image, image_get::retrieve_image, image_persist::persist_image,
    image_update::update_image, image_upload::upload_image, root::root,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Json, Router,
};
use pictor_core::{Config, MediaBackend};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let mut app = app_routes(state.clone());

    if state.backend == MediaBackend::Local {
        if let Some(path) = config.local_storage_path() {
            tracing::info!(path = %path, "Serving local media under /media");
            app = app.nest_service("/media", ServeDir::new(path));
        }
    }

    tracing::info!(
        max_upload_bytes = config.max_upload_size_bytes(),
        "Request body limit layer enabled"
    );

    let app = app
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Image, health and documentation routes with state applied, without the outer layers.
pub fn app_routes(state: Arc<AppState>) -> Router<()> {
    image_routes()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
}

/// Remote ids may contain `/` (Cloudinary folders), hence the catch-all segments.
fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/image-upload", post(upload_image))
        .route("/persist-image", post(persist_image))
        .route("/retrieve-image/{*remote_id}", get(retrieve_image))
        .route("/update-image/{*remote_id}", put(update_image))
        .route("/delete-image/{*remote_id}", delete(delete_image))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
