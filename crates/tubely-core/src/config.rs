//! Configuration module
//!
//! Process configuration is read once at startup from the environment (a `.env`
//! file is loaded first when present). `Config::from_lookup` takes the variable
//! source as a closure so parsing can be exercised without touching the process
//! environment.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT};
use crate::storage_types::ThumbnailBackend;

const DB_MAX_CONNECTIONS: u32 = 5;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server-wide settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub log_format: LogFormat,
}

/// Thumbnail ingestion settings
#[derive(Clone, Debug)]
pub struct ThumbnailConfig {
    pub backend: ThumbnailBackend,
    /// Directory for file-backed strategies
    pub assets_root: PathBuf,
    /// Prefix for returned URLs, without a trailing slash
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    /// Lowercased `type/subtype` entries
    pub allowed_content_types: Vec<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub thumbnails: ThumbnailConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port: u16 = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let max_upload_mb: usize = match lookup("MAX_UPLOAD_MB") {
            Some(mb) => mb
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_MB must be a valid number"))?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_MB is too large"))?;

        let backend = match lookup("THUMBNAIL_STORAGE") {
            Some(value) => value.parse()?,
            None => ThumbnailBackend::RandomFile,
        };

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::to_lowercase) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let base = BaseConfig {
            server_port,
            environment,
            cors_origins: parse_list(&lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string())),
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: lookup("DATABASE_URL"),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DB_MAX_CONNECTIONS),
            log_format,
        };

        let thumbnails = ThumbnailConfig {
            backend,
            assets_root: PathBuf::from(lookup("ASSETS_ROOT").unwrap_or_else(|| "./assets".to_string())),
            public_base_url,
            max_upload_bytes,
            allowed_content_types: parse_list(
                &lookup("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
            )
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect(),
        };

        Ok(Config { base, thumbnails })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if let Some(url) = &self.base.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.thumbnails.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_MB must be greater than 0"));
        }

        if self.thumbnails.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES must not be empty"));
        }

        if let Some(bad) = self
            .thumbnails
            .allowed_content_types
            .iter()
            .find(|ct| !ct.contains('/'))
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES entry '{}' is not a media type",
                bad
            ));
        }

        if !self.thumbnails.public_base_url.starts_with("http://")
            && !self.thumbnails.public_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!("PUBLIC_BASE_URL must be an http(s) URL"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn database_url(&self) -> Option<&str> {
        self.base.database_url.as_deref()
    }

    pub fn thumbnail_backend(&self) -> ThumbnailBackend {
        self.thumbnails.backend
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.thumbnails.max_upload_bytes
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
