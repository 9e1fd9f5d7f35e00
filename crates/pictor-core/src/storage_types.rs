use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Media host backend types
///
/// Selected at startup via `MEDIA_BACKEND`. Defined in core because both configuration
/// and the storage factory need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    Cloudinary,
    Local,
}

impl FromStr for MediaBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(MediaBackend::Cloudinary),
            "local" => Ok(MediaBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid media backend: {}", s)),
        }
    }
}

impl Display for MediaBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaBackend::Cloudinary => write!(f, "cloudinary"),
            MediaBackend::Local => write!(f, "local"),
        }
    }
}

/// Digest used to sign media host requests, selected via `CLOUDINARY_SIGNATURE_ALGORITHM`.
///
/// Cloudinary accounts accept SHA-1 signatures unless the account is switched to SHA-256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            _ => Err(anyhow::anyhow!("Invalid signature algorithm: {}", s)),
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SignatureAlgorithm::Sha1 => write!(f, "sha1"),
            SignatureAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}
