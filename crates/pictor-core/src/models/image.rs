use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// A persisted image metadata row.
///
/// `remote_id` is the identifier the media host assigned on upload and the key that ties the
/// row to its asset; `id` and the timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct ImageRecord {
    pub id: i64,
    pub title: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cloudinary_id"))]
    pub remote_id: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "image_url"))]
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new metadata row.
#[derive(Debug, Clone, Copy)]
pub struct NewImage<'a> {
    pub title: &'a str,
    pub remote_id: &'a str,
    pub url: &'a str,
}

/// Replacement values for an existing row, which may be moved to a new `remote_id`.
#[derive(Debug, Clone, Copy)]
pub struct ImageUpdate<'a> {
    pub title: &'a str,
    pub remote_id: &'a str,
    pub url: &'a str,
}
