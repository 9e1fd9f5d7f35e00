use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::traits::{StorageError, StorageResult};

/// A decoded `data:` URI.
#[derive(Debug)]
pub(crate) struct DataUri {
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

/// Decode `data:[<mime>][;base64],<payload>`. Only base64 payloads are accepted.
pub(crate) fn decode_data_uri(uri: &str) -> StorageResult<DataUri> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| StorageError::InvalidSource("not a data URI".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| StorageError::InvalidSource("data URI has no payload".to_string()))?;

    let mut parts = meta.split(';');
    let mime = parts
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_lowercase);
    if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(StorageError::InvalidSource(
            "only base64 data URIs are supported".to_string(),
        ));
    }

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| StorageError::InvalidSource(format!("invalid base64 payload: {}", e)))?;
    if data.is_empty() {
        return Err(StorageError::InvalidSource("empty image payload".to_string()));
    }

    Ok(DataUri { mime, data })
}

/// File format implied by a MIME type, e.g. `image/png` -> `png`.
pub(crate) fn format_from_mime(mime: &str) -> Option<String> {
    let subtype = mime.split('/').nth(1)?.split(';').next()?.trim();
    match subtype {
        "" => None,
        "jpeg" | "pjpeg" => Some("jpg".to_string()),
        "svg+xml" => Some("svg".to_string()),
        other => Some(other.to_lowercase()),
    }
}
