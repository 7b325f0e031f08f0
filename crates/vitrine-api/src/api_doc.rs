//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vitrine_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vitrine Media API",
        version = "0.1.0",
        description = "Product media upload API for the storefront back office. Images and videos are admitted against type and quota rules, then published to the remote media store."
    ),
    paths(
        // Uploads
        handlers::upload::upload_single,
        handlers::upload::upload_multiple,
        // Health
        handlers::health::health_check,
        handlers::health::ping,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::upload::SingleUploadResponse,
        handlers::upload::BatchUploadResponse,
        handlers::upload::BatchUploadResult,
        handlers::health::HealthResponse,
        handlers::health::PingResponse,
        models::PublishedAsset,
        models::UploadField,
        models::MediaKind,
        vitrine_core::StoreBackend,
    )),
    tags(
        (name = "uploads", description = "Product image and video uploads"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
