//! Pictor Core Library
//!
//! Domain models, the error taxonomy, call deadlines and configuration shared by the
//! storage, database and API crates.

pub mod config;
pub mod deadline;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, CloudinaryCredentials, Config, ServiceConfig};
pub use deadline::{Deadline, DeadlineError};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AssetDescriptor, DestroyOutcome, ImageRecord, ImageSource, ImageUpdate, NewImage};
pub use storage_types::{MediaBackend, SignatureAlgorithm};
