//! Multipart decoding for thumbnail uploads

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;
use tubely_core::constants::THUMBNAIL_FIELD;
use tubely_core::{AppError, UploadedImage};

/// Upload limits applied while decoding the form
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_upload_bytes: usize,
    /// Lowercased `type/subtype` entries
    pub allowed_content_types: Vec<String>,
}

impl UploadLimits {
    pub fn new(max_upload_bytes: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_upload_bytes,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &tubely_core::Config) -> Self {
        Self::new(
            config.thumbnails.max_upload_bytes,
            config.thumbnails.allowed_content_types.clone(),
        )
    }
}

/// Read the `thumbnail` field from a multipart form.
///
/// The part's declared media type is checked before its body is read, and the body
/// is read incrementally so an oversized part is rejected as soon as it crosses
/// `max_upload_bytes`. Other fields are skipped.
pub async fn decode_thumbnail(
    mut multipart: Multipart,
    limits: &UploadLimits,
) -> Result<UploadedImage, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limits))?
    {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let media_type = validate_media_type(field.content_type(), limits)?;

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limits))? {
            if data.len() + chunk.len() > limits.max_upload_bytes {
                return Err(AppError::PayloadTooLarge {
                    max_bytes: limits.max_upload_bytes,
                });
            }
            data.extend_from_slice(&chunk);
        }

        tracing::debug!(
            media_type = %media_type,
            size_bytes = data.len(),
            "Thumbnail part decoded"
        );

        return Ok(UploadedImage::new(data.freeze(), media_type));
    }

    Err(AppError::MissingField(THUMBNAIL_FIELD.to_string()))
}

fn multipart_error(err: MultipartError, limits: &UploadLimits) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            max_bytes: limits.max_upload_bytes,
        }
    } else {
        AppError::ReadFailure(err.body_text())
    }
}

/// Strip parameters (e.g. "image/png; charset=binary" -> "image/png") and lowercase.
fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

fn validate_media_type(
    content_type: Option<&str>,
    limits: &UploadLimits,
) -> Result<String, AppError> {
    let unsupported = |media_type: String| AppError::UnsupportedMediaType {
        media_type,
        allowed: limits.allowed_content_types.clone(),
    };

    let raw = content_type.ok_or_else(|| unsupported("none".to_string()))?;
    let media_type = normalize_media_type(raw);

    let well_formed = matches!(
        media_type.split_once('/'),
        Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty()
    );
    if !well_formed {
        return Err(unsupported(raw.to_string()));
    }

    if !limits.allowed_content_types.contains(&media_type) {
        return Err(unsupported(media_type));
    }

    Ok(media_type)
}
