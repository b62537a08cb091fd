//! Tubely API Library
//!
//! HTTP surface of the thumbnail ingestion service: handlers, bearer-token
//! authentication, the multipart decoder and upload orchestrator, and application setup.

mod api_doc;
mod handlers;
mod middleware;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
