//! Metadata store abstraction

use async_trait::async_trait;
use pictor_core::models::{ImageRecord, ImageUpdate, NewImage};
use pictor_core::{AppError, Deadline};

/// Operations over the `images` table.
///
/// Every call takes the caller's `Deadline` and fails with `AppError::Interrupted` when it
/// is exceeded or cancelled. `update` and `delete` report the number of affected rows;
/// zero means no row carried the given remote id.
#[async_trait]
pub trait ImageMetadataStore: Send + Sync {
    /// Insert a row and return it with its store-assigned fields.
    async fn insert(&self, image: NewImage<'_>, deadline: &Deadline)
        -> Result<ImageRecord, AppError>;

    async fn find_by_remote_id(
        &self,
        remote_id: &str,
        deadline: &Deadline,
    ) -> Result<Option<ImageRecord>, AppError>;

    /// Rewrite the row stored under `remote_id`, possibly moving it to a new remote id.
    async fn update(
        &self,
        remote_id: &str,
        update: ImageUpdate<'_>,
        deadline: &Deadline,
    ) -> Result<u64, AppError>;

    async fn delete(&self, remote_id: &str, deadline: &Deadline) -> Result<u64, AppError>;

    /// Round-trip to the store, for readiness checks.
    async fn ping(&self, deadline: &Deadline) -> Result<(), AppError>;
}
