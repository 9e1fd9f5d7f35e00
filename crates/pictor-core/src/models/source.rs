use bytes::Bytes;

/// Image payload handed to the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw file contents, e.g. from a multipart file part.
    Bytes {
        data: Bytes,
        filename: Option<String>,
        content_type: Option<String>,
    },
    /// A `data:<mime>;base64,<payload>` URI.
    DataUri(String),
    /// Anything else the media host accepts as an upload source, typically a remote URL.
    Reference(String),
}

impl ImageSource {
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        ImageSource::Bytes {
            data: data.into(),
            filename: None,
            content_type: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Bytes { .. } => "bytes",
            ImageSource::DataUri(_) => "data_uri",
            ImageSource::Reference(_) => "reference",
        }
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        if value.trim_start().starts_with("data:") {
            ImageSource::DataUri(value)
        } else {
            ImageSource::Reference(value)
        }
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        ImageSource::from(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_classification() {
        assert_eq!(
            ImageSource::from("data:image/png;base64,iVBORw0KGgo=").kind(),
            "data_uri"
        );
        assert_eq!(
            ImageSource::from("https://example.com/cat.jpg").kind(),
            "reference"
        );
        assert_eq!(ImageSource::from_bytes(vec![1u8, 2, 3]).kind(), "bytes");
    }
}
