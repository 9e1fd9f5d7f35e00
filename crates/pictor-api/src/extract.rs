//! Request body extraction for image routes.
//!
//! Every image route accepts `{title?, image}` as JSON, as a url-encoded form or as
//! `multipart/form-data`. In a multipart body `image` is taken as raw bytes when the part has
//! a filename or a non-text content type; otherwise it is a text field classified by
//! `ImageSource::from`.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use pictor_core::models::ImageSource;
use pictor_core::AppError;
use serde::Deserialize;

use crate::error::HttpAppError;

#[derive(Debug, Default, Deserialize)]
struct RawImageBody {
    title: Option<String>,
    image: Option<String>,
}

/// `title` and `image` as sent by the client, before any requirement is checked.
#[derive(Debug, Default)]
pub struct ImagePayload {
    pub title: Option<String>,
    pub image: Option<ImageSource>,
}

impl ImagePayload {
    fn from_raw(raw: RawImageBody) -> Self {
        Self {
            title: raw.title,
            image: raw.image.map(ImageSource::from),
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut payload = ImagePayload::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("title") => payload.title = Some(field.text().await?),
                Some("image") => {
                    let filename = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let binary = is_binary_part(filename.as_deref(), content_type.as_deref());
                    payload.image = Some(if binary {
                        ImageSource::Bytes {
                            data: field.bytes().await?,
                            filename,
                            content_type,
                        }
                    } else {
                        ImageSource::from(field.text().await?)
                    });
                }
                _ => {}
            }
        }

        Ok(payload)
    }

    /// The image, or a 400 if it was not sent.
    pub fn require_image(self) -> Result<ImageSource, HttpAppError> {
        self.image
            .ok_or_else(|| AppError::InvalidInput("image is required".to_string()).into())
    }

    /// Title and image, or a 400 if either is missing.
    pub fn require_title_and_image(self) -> Result<(String, ImageSource), HttpAppError> {
        let Self { title, image } = self;
        let title = title.ok_or_else(|| AppError::InvalidInput("title is required".to_string()))?;
        let image = image.ok_or_else(|| AppError::InvalidInput("image is required".to_string()))?;
        Ok((title, image))
    }
}

fn is_binary_part(filename: Option<&str>, content_type: Option<&str>) -> bool {
    filename.is_some()
        || content_type.is_some_and(|mime| !mime.trim().to_ascii_lowercase().starts_with("text/"))
}

impl<S> FromRequest<S> for ImagePayload
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(raw) = Form::<RawImageBody>::from_request(req, state).await?;
            Ok(Self::from_raw(raw))
        } else {
            let Json(raw) = Json::<RawImageBody>::from_request(req, state).await?;
            Ok(Self::from_raw(raw))
        }
    }
}
