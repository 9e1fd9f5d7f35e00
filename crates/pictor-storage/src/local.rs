use crate::source::{decode_data_uri, format_from_mime};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::MediaBackend;
use async_trait::async_trait;
use pictor_core::models::{AssetDescriptor, DestroyOutcome, ImageSource};
use pictor_core::Deadline;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem media host
///
/// Each upload is written to `<base_path>/<remote_id>` and served from
/// `<base_url>/<remote_id>`. Remote references cannot be fetched by this backend.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored images (e.g., "/var/lib/pictor/media")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:3001/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Map a remote id to its file, refusing anything that is not a single path segment.
    fn id_to_path(&self, remote_id: &str) -> StorageResult<PathBuf> {
        if remote_id.is_empty()
            || remote_id.contains("..")
            || remote_id.contains('/')
            || remote_id.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Remote id contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(remote_id))
    }

    fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn generate_url(&self, remote_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), remote_id)
    }

    async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    async fn store(&self, source: ImageSource) -> StorageResult<AssetDescriptor> {
        let (data, mime) = match source {
            ImageSource::Bytes {
                data, content_type, ..
            } => (data.to_vec(), content_type),
            ImageSource::DataUri(uri) => {
                let decoded = decode_data_uri(&uri)?;
                (decoded.data, decoded.mime)
            }
            ImageSource::Reference(reference) => {
                return Err(StorageError::InvalidSource(format!(
                    "local backend cannot fetch remote reference {}",
                    reference
                )));
            }
        };

        if data.is_empty() {
            return Err(StorageError::InvalidSource("empty image payload".to_string()));
        }

        let remote_id = Self::generate_id();
        let path = self.id_to_path(&remote_id)?;
        let start = std::time::Instant::now();

        Self::write_file(&path, &data).await?;

        tracing::info!(
            path = %path.display(),
            remote_id = %remote_id,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        let mut asset = AssetDescriptor::new(remote_id.clone(), self.generate_url(&remote_id));
        asset.format = mime.as_deref().and_then(format_from_mime);
        asset.bytes = Some(data.len() as u64);
        Ok(asset)
    }

    async fn remove(&self, remote_id: &str) -> StorageResult<DestroyOutcome> {
        let path = self.id_to_path(remote_id)?;
        let start = std::time::Instant::now();

        let exists = fs::try_exists(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to inspect file {}: {}", path.display(), e))
        })?;
        if !exists {
            tracing::debug!(remote_id = %remote_id, "Local storage destroy: nothing to remove");
            return Ok(DestroyOutcome::not_found());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            remote_id = %remote_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage destroy successful"
        );

        Ok(DestroyOutcome::ok())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    #[tracing::instrument(skip(self, source, deadline), fields(storage.backend = "local", storage.operation = "upload", source.kind = source.kind()))]
    async fn upload(
        &self,
        source: ImageSource,
        deadline: &Deadline,
    ) -> StorageResult<AssetDescriptor> {
        deadline.run(self.store(source)).await?
    }

    #[tracing::instrument(skip(self, deadline), fields(storage.backend = "local", storage.operation = "destroy"))]
    async fn destroy(
        &self,
        remote_id: &str,
        deadline: &Deadline,
    ) -> StorageResult<DestroyOutcome> {
        deadline.run(self.remove(remote_id)).await?
    }

    fn backend_type(&self) -> MediaBackend {
        MediaBackend::Local
    }
}
