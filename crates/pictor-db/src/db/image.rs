use async_trait::async_trait;
use pictor_core::models::{ImageRecord, ImageUpdate, NewImage};
use pictor_core::{AppError, Deadline};
use sqlx::{PgPool, Postgres};

use crate::traits::ImageMetadataStore;

const IMAGE_COLUMNS: &str = "id, title, cloudinary_id, image_url, created_at, updated_at";

/// Repository for the `images` table
///
/// Holds a handle to the shared pool. Each query checks a connection out for its own
/// duration only; nothing here keeps a connection across calls.
#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageMetadataStore for ImageRepository {
    #[tracing::instrument(skip(self, image, deadline), fields(db.table = "images", db.operation = "insert", remote_id = %image.remote_id))]
    async fn insert(
        &self,
        image: NewImage<'_>,
        deadline: &Deadline,
    ) -> Result<ImageRecord, AppError> {
        let sql = format!(
            "INSERT INTO images (title, cloudinary_id, image_url) VALUES ($1, $2, $3) RETURNING {}",
            IMAGE_COLUMNS
        );
        let query = sqlx::query_as::<Postgres, ImageRecord>(&sql)
            .bind(image.title)
            .bind(image.remote_id)
            .bind(image.url)
            .fetch_one(&self.pool);

        let record = deadline.run(query).await??;

        tracing::debug!(id = record.id, "Image row inserted");
        Ok(record)
    }

    #[tracing::instrument(skip(self, deadline), fields(db.table = "images", db.operation = "select"))]
    async fn find_by_remote_id(
        &self,
        remote_id: &str,
        deadline: &Deadline,
    ) -> Result<Option<ImageRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM images WHERE cloudinary_id = $1",
            IMAGE_COLUMNS
        );
        let query = sqlx::query_as::<Postgres, ImageRecord>(&sql)
            .bind(remote_id)
            .fetch_optional(&self.pool);

        Ok(deadline.run(query).await??)
    }

    #[tracing::instrument(skip(self, update, deadline), fields(db.table = "images", db.operation = "update", new_remote_id = %update.remote_id))]
    async fn update(
        &self,
        remote_id: &str,
        update: ImageUpdate<'_>,
        deadline: &Deadline,
    ) -> Result<u64, AppError> {
        let query = sqlx::query(
            r#"
            UPDATE images
            SET title = $1, cloudinary_id = $2, image_url = $3, updated_at = NOW()
            WHERE cloudinary_id = $4
            "#,
        )
        .bind(update.title)
        .bind(update.remote_id)
        .bind(update.url)
        .bind(remote_id)
        .execute(&self.pool);

        let result = deadline.run(query).await??;
        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self, deadline), fields(db.table = "images", db.operation = "delete"))]
    async fn delete(&self, remote_id: &str, deadline: &Deadline) -> Result<u64, AppError> {
        let query = sqlx::query("DELETE FROM images WHERE cloudinary_id = $1")
            .bind(remote_id)
            .execute(&self.pool);

        let result = deadline.run(query).await??;
        Ok(result.rows_affected())
    }

    async fn ping(&self, deadline: &Deadline) -> Result<(), AppError> {
        let query = sqlx::query_scalar::<Postgres, i32>("SELECT 1").fetch_one(&self.pool);
        deadline.run(query).await??;
        Ok(())
    }
}
