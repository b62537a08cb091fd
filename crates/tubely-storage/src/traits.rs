//! Storage abstraction trait
//!
//! This module defines the `ThumbnailStorage` trait that all backends implement.

use async_trait::async_trait;
use thiserror::Error;
use tubely_core::{ThumbnailBackend, UploadedImage};
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Random key generation failed: {0}")]
    KeyGeneration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Thumbnail storage abstraction
///
/// Backends are interchangeable and selected once at startup; callers only see
/// this trait. A returned URL is only valid once `put` has returned `Ok`.
#[async_trait]
pub trait ThumbnailStorage: Send + Sync {
    /// Store `image` for `video_id` and return the URL to put on the video record.
    async fn put(&self, video_id: Uuid, image: &UploadedImage) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> ThumbnailBackend;
}
