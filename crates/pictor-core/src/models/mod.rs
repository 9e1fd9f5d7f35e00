pub mod asset;
pub mod image;
pub mod source;

pub use asset::{AssetDescriptor, DestroyOutcome};
pub use image::{ImageRecord, ImageUpdate, NewImage};
pub use source::ImageSource;
