//! Tubely Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the storage, database and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{UploadedImage, Video, VideoResponse};
pub use storage_types::ThumbnailBackend;
