//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::constants::{ASSETS_ROUTE, THUMBNAILS_ROUTE, THUMBNAIL_UPLOAD_ROUTE};
use tubely_core::Config;
use utoipa::OpenApi;

/// Headroom over the thumbnail limit for multipart boundaries, part headers and
/// small extra fields. The decoder enforces the exact limit on the part itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(upload_routes(config));

    if state.storage.memory.is_some() {
        app = app.route(
            &format!("{}/{{video_id}}", THUMBNAILS_ROUTE),
            get(handlers::thumbnail_get::get_thumbnail),
        );
    }

    if config.thumbnail_backend().is_file_backed() {
        tracing::info!(
            assets_root = %config.thumbnails.assets_root.display(),
            "Serving thumbnail assets"
        );
        app = app.nest_service(ASSETS_ROUTE, ServeDir::new(&config.thumbnails.assets_root));
    }

    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn upload_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/{{video_id}}", THUMBNAIL_UPLOAD_ROUTE),
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES,
        ))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.base.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .base
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
