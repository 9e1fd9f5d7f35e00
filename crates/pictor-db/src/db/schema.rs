use pictor_core::AppError;
use sqlx::PgPool;

const SCHEMA: &str = include_str!("../../schema.sql");

/// Create the `images` table if it does not exist. Safe to run on every start.
#[tracing::instrument(skip(pool), fields(db.table = "images", db.operation = "create_table"))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::debug!("images table present");
    Ok(())
}
