//! Database setup and initialization

use anyhow::{Context, Result};
use pictor_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Setup the connection pool and, when enabled, the `images` table.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    if config.ensure_schema() {
        pictor_db::ensure_schema(&pool)
            .await
            .context("Failed to ensure database schema")?;
        tracing::info!("Database schema ensured");
    }

    Ok(pool)
}
