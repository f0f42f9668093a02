//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use drape_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Drape API",
        version = "0.1.0",
        description = "Garment file registration (v0). Clients register each required file of a garment, upload it with the returned presigned URL, and the garment becomes ready once every category is present."
    ),
    paths(
        handlers::garment_files::upload_garment_file,
        handlers::garment_status::get_garment_status,
        handlers::health::health_check,
    ),
    components(schemas(
        models::UploadFileRequest,
        models::UploadFileResponse,
        models::GarmentStatusResponse,
        models::CategoryStatus,
        drape_core::Category,
        error::ErrorResponse,
    )),
    tags(
        (name = "garments", description = "Garment file registration and status"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
