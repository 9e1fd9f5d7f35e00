//! Pictor metadata store
//!
//! The `images` table, keyed by the media host's remote id. `ImageMetadataStore` is the
//! seam the orchestration layer depends on; `ImageRepository` is its Postgres implementation.

pub mod db;
pub mod traits;

pub use db::{ensure_schema, ImageRepository};
pub use traits::ImageMetadataStore;
