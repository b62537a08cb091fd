//! Error types module
//!
//! All failures of the thumbnail ingestion path are unified under `AppError`. Each
//! variant describes how it is presented to clients through the `ErrorMetadata`
//! trait; the HTTP crate only renders what is described here.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected credentials and ownership violations
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_TOKEN")
    fn error_code(&self) -> &'static str;

    /// Whether the same request may succeed if resubmitted unchanged
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing or malformed authorization header")]
    AuthHeaderMissing,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Video not found: {0}")]
    RecordNotFound(Uuid),

    #[error("No thumbnail stored for video {0}")]
    ThumbnailNotFound(Uuid),

    #[error("User {user_id} does not own video {video_id}")]
    OwnershipMismatch { video_id: Uuid, user_id: Uuid },

    #[error("Upload exceeds maximum size of {max_bytes} bytes")]
    PayloadTooLarge { max_bytes: usize },

    #[error("Missing form field: {0}")]
    MissingField(String),

    #[error("Unsupported media type '{media_type}' (allowed: {allowed:?})")]
    UnsupportedMediaType {
        media_type: String,
        allowed: Vec<String>,
    },

    #[error("Failed to read upload: {0}")]
    ReadFailure(String),

    #[error("Storage error: {0}")]
    StorageFailure(String),

    #[error("Failed to update video: {0}")]
    UpdateConflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid ID: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::AuthHeaderMissing => (401, "AUTH_HEADER_MISSING", false, false, LogLevel::Debug),
        AppError::InvalidToken(_) => (401, "INVALID_TOKEN", false, false, LogLevel::Warn),
        // Not Found rather than Unauthorized: video ids are already resolvable
        // through the public thumbnail and asset URLs.
        AppError::RecordNotFound(_) => (404, "VIDEO_NOT_FOUND", false, false, LogLevel::Debug),
        AppError::ThumbnailNotFound(_) => (404, "THUMBNAIL_NOT_FOUND", false, false, LogLevel::Debug),
        AppError::OwnershipMismatch { .. } => {
            (401, "OWNERSHIP_MISMATCH", false, false, LogLevel::Warn)
        }
        AppError::PayloadTooLarge { .. } => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::MissingField(_) => (400, "MISSING_FIELD", false, false, LogLevel::Debug),
        AppError::UnsupportedMediaType { .. } => {
            (400, "UNSUPPORTED_MEDIA_TYPE", false, false, LogLevel::Debug)
        }
        AppError::ReadFailure(_) => (400, "READ_FAILURE", true, false, LogLevel::Warn),
        AppError::StorageFailure(_) => (500, "STORAGE_ERROR", true, true, LogLevel::Error),
        AppError::UpdateConflict(_) => (409, "UPDATE_CONFLICT", true, true, LogLevel::Warn),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::AuthHeaderMissing => "AuthHeaderMissing",
            AppError::InvalidToken(_) => "InvalidToken",
            AppError::RecordNotFound(_) => "RecordNotFound",
            AppError::ThumbnailNotFound(_) => "ThumbnailNotFound",
            AppError::OwnershipMismatch { .. } => "OwnershipMismatch",
            AppError::PayloadTooLarge { .. } => "PayloadTooLarge",
            AppError::MissingField(_) => "MissingField",
            AppError::UnsupportedMediaType { .. } => "UnsupportedMediaType",
            AppError::ReadFailure(_) => "ReadFailure",
            AppError::StorageFailure(_) => "StorageFailure",
            AppError::UpdateConflict(_) => "UpdateConflict",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::AuthHeaderMissing => "Couldn't find JWT".to_string(),
            AppError::InvalidToken(_) => "Couldn't validate JWT".to_string(),
            AppError::RecordNotFound(_) => "Video not found".to_string(),
            AppError::ThumbnailNotFound(_) => "Thumbnail not found".to_string(),
            AppError::OwnershipMismatch { .. } => "Not authorized to modify this video".to_string(),
            AppError::PayloadTooLarge { max_bytes } => format!(
                "Thumbnail exceeds maximum allowed size of {} MB",
                max_bytes / 1024 / 1024
            ),
            AppError::MissingField(field) => format!("Missing form field '{}'", field),
            AppError::UnsupportedMediaType { allowed, .. } => format!(
                "Unsupported thumbnail type. Allowed types: {}",
                allowed.join(", ")
            ),
            AppError::ReadFailure(_) => "Failed to read uploaded thumbnail".to_string(),
            AppError::StorageFailure(_) => "Failed to store thumbnail".to_string(),
            AppError::UpdateConflict(_) => "Failed to update video".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
