//! Cloudinary media host backend
//!
//! Uploads go to `POST {api_base}/{cloud_name}/image/upload` as a signed multipart form and
//! destroys to `POST {api_base}/{cloud_name}/image/destroy` as a signed url-encoded form.
//! Signatures are the hex digest of the sorted `key=value&...` parameters followed by the
//! API secret. SHA-1 is the account default; SHA-256 is used only when configured.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use pictor_core::models::{AssetDescriptor, DestroyOutcome, ImageSource};
use pictor_core::{CloudinaryCredentials, Deadline, SignatureAlgorithm};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::traits::{Storage, StorageError, StorageResult};
use crate::MediaBackend;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DestroyBody {
    result: String,
}

#[derive(Clone)]
pub struct CloudinaryStorage {
    http_client: Client,
    api_base: String,
    credentials: CloudinaryCredentials,
    folder: Option<String>,
    signature_algorithm: SignatureAlgorithm,
}

impl std::fmt::Debug for CloudinaryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryStorage")
            .field("api_base", &self.api_base)
            .field("cloud_name", &self.credentials.cloud_name)
            .field("folder", &self.folder)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl CloudinaryStorage {
    /// Create a client for the given account.
    ///
    /// `timeout` bounds each HTTP exchange on its own; the caller's `Deadline` bounds the
    /// call as a whole.
    pub fn new(
        credentials: CloudinaryCredentials,
        folder: Option<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_base: DEFAULT_API_BASE.to_string(),
            credentials,
            folder,
            signature_algorithm: SignatureAlgorithm::default(),
        })
    }

    pub fn with_signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = algorithm;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.api_base, self.credentials.cloud_name, action
        )
    }

    /// Sign request parameters. `file`, `api_key`, `resource_type` and `cloud_name` are never
    /// part of the signed set.
    pub(crate) fn signature(&self, params: &BTreeMap<&'static str, String>) -> String {
        let to_sign = params
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        match self.signature_algorithm {
            SignatureAlgorithm::Sha1 => digest_hex::<Sha1>(&to_sign, &self.credentials.api_secret),
            SignatureAlgorithm::Sha256 => {
                digest_hex::<Sha256>(&to_sign, &self.credentials.api_secret)
            }
        }
    }

    fn signed_params(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = self.signature(&params);
        params.insert("signature", signature);
        params.insert("api_key", self.credentials.api_key.clone());
        params
    }

    fn file_part(source: ImageSource) -> StorageResult<Part> {
        match source {
            ImageSource::Bytes {
                data,
                filename,
                content_type,
            } => {
                if data.is_empty() {
                    return Err(StorageError::InvalidSource("empty image payload".to_string()));
                }
                let part = Part::bytes(data.to_vec())
                    .file_name(filename.unwrap_or_else(|| "upload".to_string()));
                match content_type {
                    Some(mime) => part
                        .mime_str(&mime)
                        .map_err(|e| StorageError::InvalidSource(format!("invalid content type {}: {}", mime, e))),
                    None => Ok(part),
                }
            }
            // The host fetches or decodes string sources itself.
            ImageSource::DataUri(value) | ImageSource::Reference(value) => {
                if value.trim().is_empty() {
                    return Err(StorageError::InvalidSource("empty image reference".to_string()));
                }
                Ok(Part::text(value))
            }
        }
    }

    /// Turn a non-success response into `Rejected`, using the host's error message when present.
    async fn rejection(response: Response) -> StorageError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        StorageError::Rejected { status, message }
    }

    async fn send_upload(&self, source: ImageSource) -> StorageResult<AssetDescriptor> {
        let mut params = BTreeMap::new();
        if let Some(folder) = &self.folder {
            params.insert("folder", folder.clone());
        }

        let mut form = Form::new().part("file", Self::file_part(source)?);
        for (key, value) in self.signed_params(params) {
            form = form.text(key, value);
        }

        let start = std::time::Instant::now();
        let response = self
            .http_client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let asset: AssetDescriptor = response
            .json()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("unreadable upload response: {}", e)))?;

        tracing::info!(
            remote_id = %asset.remote_id,
            size_bytes = asset.bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(asset)
    }

    async fn send_destroy(&self, remote_id: &str) -> StorageResult<DestroyOutcome> {
        let mut params = BTreeMap::new();
        params.insert("public_id", remote_id.to_string());

        let start = std::time::Instant::now();
        let response = self
            .http_client
            .post(self.endpoint("destroy"))
            .form(&self.signed_params(params))
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: DestroyBody = response
            .json()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("unreadable destroy response: {}", e)))?;

        tracing::info!(
            remote_id = %remote_id,
            result = %body.result,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary destroy finished"
        );

        Ok(DestroyOutcome {
            result: body.result,
        })
    }
}

fn digest_hex<D: Digest>(to_sign: &str, secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl Storage for CloudinaryStorage {
    #[tracing::instrument(skip(self, source, deadline), fields(storage.backend = "cloudinary", storage.operation = "upload", source.kind = source.kind()))]
    async fn upload(
        &self,
        source: ImageSource,
        deadline: &Deadline,
    ) -> StorageResult<AssetDescriptor> {
        deadline.run(self.send_upload(source)).await?
    }

    #[tracing::instrument(skip(self, deadline), fields(storage.backend = "cloudinary", storage.operation = "destroy"))]
    async fn destroy(
        &self,
        remote_id: &str,
        deadline: &Deadline,
    ) -> StorageResult<DestroyOutcome> {
        if remote_id.trim().is_empty() {
            return Err(StorageError::InvalidKey("remote id is empty".to_string()));
        }
        deadline.run(self.send_destroy(remote_id)).await?
    }

    fn backend_type(&self) -> MediaBackend {
        MediaBackend::Cloudinary
    }
}
