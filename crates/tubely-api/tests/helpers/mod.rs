//! Test helpers: build AppState and router for integration tests.
//!
//! Video records live in the in-memory repository and file-backed thumbnails in a
//! temporary directory, so these tests need neither Postgres nor Docker.

pub mod fixtures;

use axum_test::TestServer;
use chrono::Duration;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::JwtVerifier;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::{Config, Video};
use tubely_db::{InMemoryVideoRepository, VideoStore};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_BASE_URL: &str = "http://localhost:8091";

/// Test application: server plus handles on everything it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub videos: InMemoryVideoRepository,
    pub issuer: JwtVerifier,
    pub assets_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn assets_path(&self) -> &Path {
        self.assets_dir.path()
    }

    /// Number of entries in the assets directory
    pub fn asset_count(&self) -> usize {
        std::fs::read_dir(self.assets_path())
            .expect("Failed to read assets directory")
            .count()
    }

    pub async fn create_video(&self, owner_id: Uuid) -> Video {
        let video = Video::new(owner_id, "Boots", "A video about boots");
        self.videos
            .create_video(&video)
            .await
            .expect("Failed to create video")
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.videos
            .get_video(id)
            .await
            .expect("Failed to load video")
            .expect("Video missing")
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.issuer
            .issue(user_id, Duration::hours(1))
            .expect("Failed to issue token")
    }
}

/// Setup a test app using the given thumbnail backend name.
pub async fn setup_test_app(backend: &str) -> TestApp {
    setup_test_app_with(backend, &[]).await
}

/// Setup a test app with extra environment overrides.
pub async fn setup_test_app_with(backend: &str, extra: &[(&str, &str)]) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(backend, assets_dir.path(), extra);

    let videos = InMemoryVideoRepository::new();
    let storage = tubely_storage::create_storage(&config)
        .await
        .expect("Failed to create thumbnail storage");

    let state = Arc::new(AppState::new(
        &config,
        Arc::new(videos.clone()),
        storage,
        Arc::new(JwtVerifier::new(TEST_JWT_SECRET)),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        issuer: JwtVerifier::new(TEST_JWT_SECRET),
        assets_dir,
    }
}

fn create_test_config(backend: &str, assets_root: &Path, extra: &[(&str, &str)]) -> Config {
    let mut vars: Vec<(String, String)> = vec![
        ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ("THUMBNAIL_STORAGE".to_string(), backend.to_string()),
        (
            "ASSETS_ROOT".to_string(),
            assets_root.to_string_lossy().to_string(),
        ),
        ("PUBLIC_BASE_URL".to_string(), TEST_BASE_URL.to_string()),
    ];
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    let config = Config::from_lookup(|key| {
        vars.iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("Failed to build test config");
    config.validate().expect("Test config is invalid");
    config
}
