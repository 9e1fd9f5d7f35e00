#[cfg(feature = "storage-cloudinary")]
use crate::CloudinaryStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{MediaBackend, Storage, StorageError, StorageResult};
use pictor_core::Config;
use std::sync::Arc;

/// Create a media host backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.media_backend() {
        #[cfg(feature = "storage-cloudinary")]
        MediaBackend::Cloudinary => {
            let credentials = config.cloudinary().cloned().ok_or_else(|| {
                StorageError::Config(
                    "CLOUD_NAME, API_KEY and API_SECRET not configured".to_string(),
                )
            })?;
            let timeout = std::time::Duration::from_secs(config.media_timeout_seconds());

            let storage = CloudinaryStorage::new(
                credentials,
                config.cloudinary_folder().map(String::from),
                timeout,
            )?
            .with_api_base(config.cloudinary_api_base())
            .with_signature_algorithm(config.cloudinary_signature_algorithm());
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-cloudinary"))]
        MediaBackend::Cloudinary => Err(StorageError::Config(
            "Cloudinary backend not available (storage-cloudinary feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        MediaBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::Config("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::Config("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        MediaBackend::Local => Err(StorageError::Config(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
