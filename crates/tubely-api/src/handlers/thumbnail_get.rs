use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tubely_core::AppError;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Serve a thumbnail held by the in-memory backend
#[utoipa::path(
    get,
    path = "/api/thumbnails/{video_id}",
    tag = "thumbnails",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Thumbnail bytes with their stored media type"),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 404, description = "No thumbnail stored for this video", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %video_id))]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Response, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))?;

    let memory = state
        .storage
        .memory
        .as_ref()
        .ok_or(AppError::ThumbnailNotFound(video_id))?;

    let thumbnail = memory
        .get(video_id)
        .await
        .ok_or(AppError::ThumbnailNotFound(video_id))?;

    Ok((
        [(header::CONTENT_TYPE, thumbnail.media_type)],
        thumbnail.data,
    )
        .into_response())
}
