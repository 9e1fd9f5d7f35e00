pub mod image_delete;
pub mod image_get;
pub mod image_persist;
pub mod image_update;
pub mod image_upload;
pub mod root;
