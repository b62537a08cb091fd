//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use crate::auth::JwtVerifier;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;

/// Build state and router from a loaded configuration
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    let videos = database::setup_video_store(&config).await?;

    let storage = tubely_storage::create_storage(&config)
        .await
        .context("Failed to initialize thumbnail storage")?;

    let verifier = Arc::new(JwtVerifier::new(config.jwt_secret()));

    let state = Arc::new(AppState::new(&config, videos, storage, verifier));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
