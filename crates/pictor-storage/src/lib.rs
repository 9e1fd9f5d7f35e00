//! Pictor Storage Library
//!
//! The media host client. `Storage` uploads image payloads and destroys stored assets;
//! `CloudinaryStorage` talks to the remote media host and `LocalStorage` keeps files on
//! disk for development.
//!
//! Every call is a single attempt. Nothing is retried and the host's answer is surfaced
//! as-is, including the result string of a destroy.

#[cfg(feature = "storage-cloudinary")]
pub mod cloudinary;
pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-local")]
pub(crate) mod source;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-cloudinary")]
pub use cloudinary::CloudinaryStorage;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use pictor_core::MediaBackend;
pub use traits::{Storage, StorageError, StorageResult};
