//! Tubely Storage Library
//!
//! This crate provides the thumbnail storage abstraction and its implementations.
//! Every backend implements [`ThumbnailStorage::put`], which stores a validated
//! image for a video and returns the URL that the video record should point at.
//!
//! # Backends
//!
//! - **memory**: process-wide table keyed by video id, served at
//!   `<base>/api/thumbnails/<video_id>`. Lives for process uptime; nothing is
//!   persisted and nothing is evicted.
//! - **random_file**: `<assets>/<random>.<ext>` served at `<base>/assets/...`.
//!   Each upload gets a new file, so replaced thumbnails stay behind as orphans.
//! - **video_id_file**: `<assets>/<video_id>.<ext>`, replaced in place on re-upload.
//!   A re-upload with a different media type leaves the old extension's file behind.
//! - **data_url**: no storage at all; the URL itself carries the base64 payload.
//!
//! Orphaned assets are never garbage-collected.

pub mod data_url;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::{RandomFileStorage, VideoIdFileStorage};
pub use data_url::DataUrlStorage;
pub use factory::{create_storage, StorageHandles};
pub use memory::{MemoryThumbnailStorage, StoredThumbnail};
pub use traits::{StorageError, StorageResult, ThumbnailStorage};
pub use tubely_core::ThumbnailBackend;
