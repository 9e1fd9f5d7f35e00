//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::responses;
use pictor_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pictor API",
        version = "0.1.0",
        description = "Image upload, persistence and retrieval. Images are stored on a media host (Cloudinary, or local disk for development) and indexed by remote id in Postgres."
    ),
    paths(
        handlers::root::root,
        handlers::image_upload::upload_image,
        handlers::image_persist::persist_image,
        handlers::image_get::retrieve_image,
        handlers::image_update::update_image,
        handlers::image_delete::delete_image,
    ),
    components(
        schemas(
            models::AssetDescriptor,
            models::DestroyOutcome,
            responses::ErrorDetail,
            responses::RootResponse,
            responses::UploadResponse,
            responses::PersistedImage,
            responses::PersistResponse,
            responses::RetrievedImage,
            responses::RetrieveResponse,
            responses::RetrieveFailure,
            responses::RetrieveFailureResponse,
            responses::DeleteResult,
            responses::DeleteResponse,
            responses::UpdateMessage,
            responses::UpdateResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "service", description = "Service liveness"),
        (name = "images", description = "Image lifecycle across the media host and the metadata store")
    )
)]
pub struct ApiDoc;
