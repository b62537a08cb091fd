use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        Path, State,
    },
    http::HeaderMap,
    Json,
};
use tubely_core::{AppError, VideoResponse};
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::thumbnail::ThumbnailUploadService;
use crate::state::AppState;

/// Upload a thumbnail for a video
///
/// The caller must present a bearer token for the video's owner. The `thumbnail`
/// form part is stored with the configured backend and the video record is
/// updated to point at it.
///
/// # Errors
/// - `AppError::InvalidInput` - Path segment is not a video id
/// - `AppError::AuthHeaderMissing` / `AppError::InvalidToken` - Bad credentials
/// - `AppError::RecordNotFound` - No such video
/// - `AppError::OwnershipMismatch` - Caller does not own the video
/// - `AppError::PayloadTooLarge` - Thumbnail exceeds the upload limit
/// - `AppError::ReadFailure` - Body is not a readable multipart form
/// - `AppError::MissingField` / `AppError::UnsupportedMediaType` - Bad form
/// - `AppError::StorageFailure` - Backend could not store the image
/// - `AppError::UpdateConflict` - Video record could not be updated
#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "thumbnails",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored and video updated", body = VideoResponse),
        (status = 400, description = "Invalid form or video id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credentials, or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 409, description = "Video could not be updated", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, headers, multipart),
    fields(video_id = %video_id, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))?;

    let video = ThumbnailUploadService::new(&state)
        .upload(video_id, &headers, multipart)
        .await?;

    Ok(Json(VideoResponse::from(video)))
}
