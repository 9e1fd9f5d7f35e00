//! Image lifecycle orchestration across the media host and the metadata store.
//!
//! Each flow runs its steps strictly in order and stops at the first failure. The two
//! stores cannot be updated atomically, so some failures leave them disagreeing:
//!
//! | Flow    | Failing step          | State left behind                              |
//! |---------|-----------------------|------------------------------------------------|
//! | persist | insert                | asset on the host with no row (orphaned asset) |
//! | replace | upload (after destroy)| row pointing at a destroyed asset              |
//! | replace | update                | new asset on the host, row still on the old id |
//! | remove  | delete                | row pointing at a destroyed asset              |
//!
//! These states are reported to the caller as the failing step's error and logged at
//! `error` with every remote id involved. Only the first one can be repaired here, and only
//! when `CompensationPolicy::DestroyOrphanedUploads` is selected.

use std::sync::Arc;
use std::time::Duration;

use pictor_core::models::{
    AssetDescriptor, DestroyOutcome, ImageRecord, ImageSource, ImageUpdate, NewImage,
};
use pictor_core::{AppError, Deadline};
use pictor_db::ImageMetadataStore;
use pictor_storage::{Storage, StorageError};

/// Budget for a compensating destroy. The request deadline may already be spent by the
/// time compensation runs.
const COMPENSATION_BUDGET: Duration = Duration::from_secs(30);

/// What to do when a step fails after an earlier step already changed the media host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompensationPolicy {
    /// Leave both stores as they are and report the failure.
    #[default]
    None,
    /// When the insert of create-and-persist fails, destroy the asset that was just uploaded.
    /// The failure is still reported as a store error.
    DestroyOrphanedUploads,
}

impl CompensationPolicy {
    pub fn from_flag(compensate: bool) -> Self {
        if compensate {
            CompensationPolicy::DestroyOrphanedUploads
        } else {
            CompensationPolicy::None
        }
    }
}

/// Failure of one flow, named after the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum ImageFlowError {
    #[error("upload failed: {0}")]
    Upload(#[source] StorageError),

    #[error("destroy failed: {0}")]
    Destroy(#[source] StorageError),

    #[error("metadata store failed: {0}")]
    Store(#[source] AppError),

    #[error("no image stored under {0}")]
    NotFound(String),
}

/// Result of a successful replace.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub destroyed: DestroyOutcome,
    pub asset: AssetDescriptor,
    pub rows_affected: u64,
}

/// Result of a successful remove.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub destroyed: DestroyOutcome,
    pub rows_affected: u64,
}

pub struct ImageLifecycleService {
    storage: Arc<dyn Storage>,
    images: Arc<dyn ImageMetadataStore>,
    policy: CompensationPolicy,
}

impl ImageLifecycleService {
    pub fn new(
        storage: Arc<dyn Storage>,
        images: Arc<dyn ImageMetadataStore>,
        policy: CompensationPolicy,
    ) -> Self {
        Self {
            storage,
            images,
            policy,
        }
    }

    /// Upload only. Nothing is written to the metadata store.
    #[tracing::instrument(skip(self, image, deadline), fields(operation = "upload", source.kind = image.kind()))]
    pub async fn upload(
        &self,
        image: ImageSource,
        deadline: &Deadline,
    ) -> Result<AssetDescriptor, ImageFlowError> {
        let asset = self.storage.upload(image, deadline).await.map_err(|e| {
            tracing::warn!(error = %e, "Upload failed");
            ImageFlowError::Upload(e)
        })?;

        tracing::info!(remote_id = %asset.remote_id, "Image uploaded");
        Ok(asset)
    }

    /// Upload, then insert a row for the new asset.
    #[tracing::instrument(skip(self, image, deadline), fields(operation = "persist", source.kind = image.kind()))]
    pub async fn persist(
        &self,
        title: &str,
        image: ImageSource,
        deadline: &Deadline,
    ) -> Result<ImageRecord, ImageFlowError> {
        let asset = self.upload(image, deadline).await?;

        let new_image = NewImage {
            title,
            remote_id: &asset.remote_id,
            url: &asset.url,
        };
        match self.images.insert(new_image, deadline).await {
            Ok(record) => {
                tracing::info!(remote_id = %record.remote_id, id = record.id, "Image persisted");
                Ok(record)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    remote_id = %asset.remote_id,
                    "Metadata insert failed after upload; asset has no row"
                );
                self.compensate_orphan(&asset.remote_id).await;
                Err(ImageFlowError::Store(e))
            }
        }
    }

    async fn compensate_orphan(&self, remote_id: &str) {
        if self.policy != CompensationPolicy::DestroyOrphanedUploads {
            return;
        }

        let deadline = Deadline::after(COMPENSATION_BUDGET);
        match self.storage.destroy(remote_id, &deadline).await {
            Ok(outcome) => tracing::warn!(
                remote_id = %remote_id,
                result = %outcome.result,
                "Destroyed orphaned upload"
            ),
            Err(e) => tracing::error!(
                error = %e,
                remote_id = %remote_id,
                "Could not destroy orphaned upload; asset remains without a row"
            ),
        }
    }

    /// Look up the row stored under `remote_id`. A missing row is a failure.
    #[tracing::instrument(skip(self, deadline), fields(operation = "retrieve"))]
    pub async fn retrieve(
        &self,
        remote_id: &str,
        deadline: &Deadline,
    ) -> Result<ImageRecord, ImageFlowError> {
        self.images
            .find_by_remote_id(remote_id, deadline)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Metadata lookup failed");
                ImageFlowError::Store(e)
            })?
            .ok_or_else(|| ImageFlowError::NotFound(remote_id.to_string()))
    }

    /// Destroy the old asset, upload the new one, then move the row over to it.
    #[tracing::instrument(skip(self, image, deadline), fields(operation = "replace", source.kind = image.kind()))]
    pub async fn replace(
        &self,
        remote_id: &str,
        title: &str,
        image: ImageSource,
        deadline: &Deadline,
    ) -> Result<UpdateOutcome, ImageFlowError> {
        let destroyed = self
            .storage
            .destroy(remote_id, deadline)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Destroy failed; asset and row untouched");
                ImageFlowError::Destroy(e)
            })?;

        let asset = match self.storage.upload(image, deadline).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    old_remote_id = %remote_id,
                    destroy_result = %destroyed.result,
                    "Upload failed after destroy; row references a destroyed asset"
                );
                return Err(ImageFlowError::Upload(e));
            }
        };

        let update = ImageUpdate {
            title,
            remote_id: &asset.remote_id,
            url: &asset.url,
        };
        let rows_affected = match self.images.update(remote_id, update, deadline).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    old_remote_id = %remote_id,
                    new_remote_id = %asset.remote_id,
                    "Metadata update failed after replacing asset; row is stale"
                );
                return Err(ImageFlowError::Store(e));
            }
        };

        if rows_affected == 0 {
            tracing::warn!(
                old_remote_id = %remote_id,
                new_remote_id = %asset.remote_id,
                "No row matched the old remote id; new asset has no row"
            );
        } else {
            tracing::info!(
                old_remote_id = %remote_id,
                new_remote_id = %asset.remote_id,
                "Image replaced"
            );
        }

        Ok(UpdateOutcome {
            destroyed,
            asset,
            rows_affected,
        })
    }

    /// Destroy the asset, then delete its row.
    #[tracing::instrument(skip(self, deadline), fields(operation = "remove"))]
    pub async fn remove(
        &self,
        remote_id: &str,
        deadline: &Deadline,
    ) -> Result<DeleteOutcome, ImageFlowError> {
        let destroyed = self
            .storage
            .destroy(remote_id, deadline)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Destroy failed; asset and row untouched");
                ImageFlowError::Destroy(e)
            })?;

        let rows_affected = match self.images.delete(remote_id, deadline).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    remote_id = %remote_id,
                    destroy_result = %destroyed.result,
                    "Row delete failed after destroy; row references a destroyed asset"
                );
                return Err(ImageFlowError::Store(e));
            }
        };

        if rows_affected == 0 {
            tracing::warn!(remote_id = %remote_id, "No row matched the remote id");
        } else {
            tracing::info!(remote_id = %remote_id, "Image removed");
        }

        Ok(DeleteOutcome {
            destroyed,
            rows_affected,
        })
    }
}
