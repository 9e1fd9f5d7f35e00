//! Database repositories and schema bootstrap

pub mod image;
pub mod schema;

pub use image::ImageRepository;
pub use schema::ensure_schema;
