//! Thumbnail upload pipeline
//!
//! `decoder` turns the multipart form into an `UploadedImage`; `service` runs the
//! upload state machine around it (authenticate, authorize, decode, store, persist).

pub mod decoder;
pub mod service;

pub use decoder::{decode_thumbnail, UploadLimits};
pub use service::ThumbnailUploadService;
