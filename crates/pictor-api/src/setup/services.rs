//! Service wiring

use std::sync::Arc;
use std::time::Duration;

use pictor_core::Config;
use pictor_db::{ImageMetadataStore, ImageRepository};
use pictor_storage::Storage;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::services::{CompensationPolicy, ImageLifecycleService};
use crate::state::AppState;

/// Build the state served by the router from a live pool and media host client.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let policy = CompensationPolicy::from_flag(config.compensate_orphaned_uploads());
    if policy == CompensationPolicy::DestroyOrphanedUploads {
        tracing::info!("Orphaned uploads will be destroyed when their insert fails");
    }

    build_state(
        storage,
        Arc::new(ImageRepository::new(pool)),
        policy,
        Duration::from_secs(config.request_deadline_seconds()),
        CancellationToken::new(),
    )
}

/// Build the state from any media host and metadata store implementation.
pub fn build_state(
    storage: Arc<dyn Storage>,
    metadata: Arc<dyn ImageMetadataStore>,
    policy: CompensationPolicy,
    request_deadline: Duration,
    shutdown: CancellationToken,
) -> Arc<AppState> {
    let backend = storage.backend_type();
    let lifecycle = ImageLifecycleService::new(storage, metadata.clone(), policy);

    Arc::new(AppState {
        lifecycle: Arc::new(lifecycle),
        metadata,
        backend,
        request_deadline,
        shutdown,
    })
}
