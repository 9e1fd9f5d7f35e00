//! Application state shared by every handler.

use std::sync::Arc;
use std::time::Duration;

use pictor_core::{Deadline, MediaBackend};
use pictor_db::ImageMetadataStore;
use tokio_util::sync::CancellationToken;

use crate::services::ImageLifecycleService;

pub struct AppState {
    pub lifecycle: Arc<ImageLifecycleService>,
    /// Kept alongside the lifecycle service for readiness probes.
    pub metadata: Arc<dyn ImageMetadataStore>,
    pub backend: MediaBackend,
    pub request_deadline: Duration,
    /// Tripped when the server starts shutting down; in-flight calls observe it through
    /// their deadline.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Fresh deadline for one request, linked to the shutdown token.
    pub fn request_deadline(&self) -> Deadline {
        Deadline::after(self.request_deadline).with_cancellation(self.shutdown.clone())
    }
}
