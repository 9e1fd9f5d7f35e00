//! Pictor API Library
//!
//! HTTP handlers, the image lifecycle service and application setup.

mod api_doc;
mod handlers;
mod telemetry;

pub mod error;
pub mod extract;
pub mod responses;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{CompensationPolicy, ImageFlowError, ImageLifecycleService};
pub use state::AppState;
