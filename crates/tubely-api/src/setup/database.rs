//! Database setup and initialization

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::Config;
use tubely_db::{InMemoryVideoRepository, PgVideoRepository, VideoStore};

/// Connect to Postgres and run migrations, or fall back to an in-memory store
/// when no `DATABASE_URL` is configured.
pub async fn setup_video_store(config: &Config) -> Result<Arc<dyn VideoStore>> {
    let Some(database_url) = config.database_url() else {
        if config.is_production() {
            anyhow::bail!("DATABASE_URL must be set in production");
        }
        tracing::warn!("DATABASE_URL not set, video records are kept in memory");
        return Ok(Arc::new(InMemoryVideoRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.base.db_max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.base.db_max_connections,
        "Database connected successfully"
    );

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgVideoRepository::new(pool)))
}
