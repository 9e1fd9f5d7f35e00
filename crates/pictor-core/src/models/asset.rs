use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored asset as reported by the media host after upload.
///
/// Serialized with the media host's own field names, which is what `POST /image-upload`
/// returns to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetDescriptor {
    #[serde(rename = "public_id")]
    pub remote_id: String,
    #[serde(rename = "secure_url")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl AssetDescriptor {
    pub fn new(remote_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            remote_id: remote_id.into(),
            url: url.into(),
            format: None,
            bytes: None,
            width: None,
            height: None,
        }
    }
}

/// Outcome of a destroy call, passed through from the media host unchanged.
///
/// The host reports `"ok"` when the asset was removed and `"not found"` when there was
/// nothing to remove; other values are possible and are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DestroyOutcome {
    pub result: String,
}

impl DestroyOutcome {
    pub const OK: &'static str = "ok";
    pub const NOT_FOUND: &'static str = "not found";

    pub fn ok() -> Self {
        Self {
            result: Self::OK.to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            result: Self::NOT_FOUND.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result == Self::OK
    }
}
