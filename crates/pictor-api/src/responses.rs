//! Response bodies of the image routes.
//!
//! Shapes and message strings are what existing clients of these routes parse, including the
//! key that carries the failure (`error`, `e` or `err`) depending on route and step.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pictor_core::models::{AssetDescriptor, DestroyOutcome, ImageRecord};
use pictor_core::ErrorMetadata;
use pictor_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::ImageFlowError;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";

/// Description of a failed step, carried under the failure key.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    pub code: String,
    /// Status the media host answered with, for media host rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
}

impl From<&StorageError> for ErrorDetail {
    fn from(err: &StorageError) -> Self {
        let message = match err {
            StorageError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            message,
            code: err.error_code().to_string(),
            http_code: err.http_code(),
        }
    }
}

impl From<&ImageFlowError> for ErrorDetail {
    fn from(err: &ImageFlowError) -> Self {
        match err {
            ImageFlowError::Upload(e) | ImageFlowError::Destroy(e) => ErrorDetail::from(e),
            ImageFlowError::Store(e) => Self {
                message: e.client_message(),
                code: e.error_code().to_string(),
                http_code: None,
            },
            ImageFlowError::NotFound(_) => Self {
                message: err.to_string(),
                code: "NOT_FOUND".to_string(),
                http_code: None,
            },
        }
    }
}

/// Key under which a failure body carries its `ErrorDetail`.
#[derive(Debug, Serialize)]
pub enum FailureKey {
    #[serde(rename = "error")]
    Error(ErrorDetail),
    #[serde(rename = "e")]
    E(ErrorDetail),
    #[serde(rename = "err")]
    Err(ErrorDetail),
}

/// `{message, error|e|err}`
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub message: &'static str,
    #[serde(flatten)]
    pub detail: FailureKey,
}

impl FailureBody {
    pub fn error(message: &'static str, err: &ImageFlowError) -> Self {
        Self {
            message,
            detail: FailureKey::Error(err.into()),
        }
    }

    pub fn e(message: &'static str, err: &ImageFlowError) -> Self {
        Self {
            message,
            detail: FailureKey::E(err.into()),
        }
    }

    pub fn err(message: &'static str, err: &ImageFlowError) -> Self {
        Self {
            message,
            detail: FailureKey::Err(err.into()),
        }
    }

    /// Every flow failure is reported as a 500.
    pub fn into_server_error(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: &'static str,
    pub result: AssetDescriptor,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersistedImage {
    pub message: &'static str,
    pub title: String,
    pub cloudinary_id: String,
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersistResponse {
    pub status: &'static str,
    pub data: PersistedImage,
}

impl From<ImageRecord> for PersistResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            status: STATUS_SUCCESS,
            data: PersistedImage {
                message: "Image Uploaded Successfully",
                title: record.title,
                cloudinary_id: record.remote_id,
                image_url: record.url,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RetrievedImage {
    /// The remote id the image is stored under.
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RetrieveResponse {
    pub status: &'static str,
    pub data: RetrievedImage,
}

impl From<ImageRecord> for RetrieveResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            status: STATUS_SUCCESS,
            data: RetrievedImage {
                id: record.remote_id,
                title: record.title,
                url: record.url,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RetrieveFailure {
    pub message: &'static str,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RetrieveFailureResponse {
    pub status: &'static str,
    pub data: RetrieveFailure,
}

impl RetrieveFailureResponse {
    pub fn new(err: &ImageFlowError) -> Self {
        Self {
            status: STATUS_FAILURE,
            data: RetrieveFailure {
                message: "could not retrieve record!",
                error: err.into(),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub row_count: u64,
    pub destroy_result: DestroyOutcome,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: &'static str,
    pub delete_result: DeleteResult,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateMessage {
    pub message: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateResponse {
    pub status: &'static str,
    pub data: UpdateMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pictor_core::AppError;

    #[test]
    fn test_failure_key_is_flattened() {
        let err = ImageFlowError::Store(AppError::Internal("boom".to_string()));
        let json = serde_json::to_value(FailureBody::e("Update Failed", &err)).unwrap();
        assert_eq!(json["message"], "Update Failed");
        assert_eq!(json["e"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["e"]["message"], "An internal error occurred");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_rejection_detail_carries_host_status() {
        let err = ImageFlowError::Upload(StorageError::Rejected {
            status: 400,
            message: "Invalid image file".to_string(),
        });
        let json = serde_json::to_value(FailureBody::err("failed", &err)).unwrap();
        assert_eq!(json["err"]["message"], "Invalid image file");
        assert_eq!(json["err"]["http_code"], 400);
        assert_eq!(json["err"]["code"], "MEDIA_HOST_REJECTED");
    }

    #[test]
    fn test_delete_result_is_camel_case() {
        let body = DeleteResponse {
            message: "Image Deleted Successfully!",
            delete_result: DeleteResult {
                row_count: 1,
                destroy_result: DestroyOutcome::ok(),
            },
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["deleteResult"]["rowCount"], 1);
        assert_eq!(json["deleteResult"]["destroyResult"]["result"], "ok");
    }
}
