pub mod image_lifecycle;

pub use image_lifecycle::{
    CompensationPolicy, DeleteOutcome, ImageFlowError, ImageLifecycleService, UpdateOutcome,
};
