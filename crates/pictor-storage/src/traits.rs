//! Storage abstraction trait
//!
//! This module defines the Storage trait that all media host backends must implement.

use crate::MediaBackend;
use async_trait::async_trait;
use pictor_core::models::{AssetDescriptor, DestroyOutcome, ImageSource};
use pictor_core::{Deadline, DeadlineError};
use thiserror::Error;

/// Media host operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    /// The host answered, but with a non-success status.
    #[error("Media host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid image source: {0}")]
    InvalidSource(String),

    #[error("Invalid remote id: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Interrupted(#[from] DeadlineError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Machine-readable error code for response bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::UploadFailed(_) => "UPLOAD_FAILED",
            StorageError::DeleteFailed(_) => "DELETE_FAILED",
            StorageError::Rejected { .. } => "MEDIA_HOST_REJECTED",
            StorageError::InvalidSource(_) => "INVALID_SOURCE",
            StorageError::InvalidKey(_) => "INVALID_REMOTE_ID",
            StorageError::Interrupted(DeadlineError::Elapsed(_)) => "DEADLINE_EXCEEDED",
            StorageError::Interrupted(DeadlineError::Cancelled) => "CANCELLED",
            StorageError::Config(_) => "CONFIGURATION_ERROR",
        }
    }

    /// HTTP status the media host answered with, when it answered at all.
    pub fn http_code(&self) -> Option<u16> {
        match self {
            StorageError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Media host abstraction
///
/// Both operations take the caller's `Deadline`; a call that outlives it fails with
/// `StorageError::Interrupted`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an image and return the descriptor the host assigned to it.
    async fn upload(
        &self,
        source: ImageSource,
        deadline: &Deadline,
    ) -> StorageResult<AssetDescriptor>;

    /// Destroy the asset stored under `remote_id`.
    ///
    /// Destroying an id the host does not know is not an error at this level: the host's
    /// own outcome (`"not found"` for Cloudinary) is returned unchanged.
    async fn destroy(&self, remote_id: &str, deadline: &Deadline)
        -> StorageResult<DestroyOutcome>;

    /// Get the media backend type
    fn backend_type(&self) -> MediaBackend;
}
