//! Application setup and initialization
//!
//! Builds the pool, the media host client, the lifecycle service and the router from a
//! `Config`, in that order.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use pictor_core::Config;
use sqlx::PgPool;
use std::sync::Arc;

/// Everything `main` needs to serve and then shut down.
pub struct App {
    pub state: Arc<AppState>,
    pub router: axum::Router,
    pub pool: PgPool,
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<App> {
    crate::telemetry::init_telemetry(config.log_json())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        backend = %config.media_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let storage = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, pool.clone(), storage);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok(App {
        state,
        router,
        pool,
    })
}
