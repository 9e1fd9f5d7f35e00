//! Storage setup and initialization

use anyhow::Result;
use pictor_core::Config;
use pictor_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing media host client...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        timeout_seconds = config.media_timeout_seconds(),
        "Media host client initialized successfully"
    );
    Ok(storage)
}
