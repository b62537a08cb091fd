//! OpenAPI documentation, served as JSON at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely Thumbnail API",
        version = "0.1.0",
        description = "Thumbnail ingestion for Tubely videos. Owners upload an image for a video; it is stored with the configured backend and the video record is updated to point at it."
    ),
    paths(
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::thumbnail_get::get_thumbnail,
        handlers::health::health_check,
    ),
    components(schemas(
        models::VideoResponse,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "thumbnails", description = "Thumbnail upload and retrieval"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
