//! File-backed thumbnail storage
//!
//! Both strategies write into one assets directory that is served by the HTTP
//! layer under `/assets`. They differ only in how the filename is chosen and in
//! whether an existing file may be replaced.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tubely_core::constants::ASSETS_ROUTE;
use tubely_core::{ThumbnailBackend, UploadedImage};
use uuid::Uuid;

use crate::keys::{filename, join_url, random_key, video_filename};
use crate::traits::{StorageError, StorageResult, ThumbnailStorage};

/// Assets directory shared by the file-backed strategies
#[derive(Clone, Debug)]
struct AssetsDir {
    base_path: PathBuf,
    base_url: String,
}

impl AssetsDir {
    async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create assets directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(Self {
            base_path,
            base_url,
        })
    }

    /// Map a generated filename to its path, refusing anything that could leave
    /// the assets directory.
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
            || name.starts_with('.')
        {
            return Err(StorageError::InvalidKey(
                "Asset name contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(name))
    }

    fn generate_url(&self, name: &str) -> String {
        join_url(&self.base_url, &format!("{}/{}", ASSETS_ROUTE, name))
    }

    /// The directory may have been removed since startup.
    async fn ensure_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }
}

/// Create `path` (which must not exist) and write `data` to it.
///
/// On failure the partially written file is removed so it cannot be mistaken
/// for a complete asset.
async fn write_new_file(path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

    let written = async {
        file.write_all(data).await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        if let Err(cleanup_err) = fs::remove_file(path).await {
            tracing::warn!(
                path = %path.display(),
                error = %cleanup_err,
                "Failed to remove partially written asset"
            );
        }
        return Err(StorageError::UploadFailed(format!(
            "Failed to write file {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

/// Random-name strategy: every upload gets a fresh `<random>.<ext>` file.
///
/// Names carry 256 bits of OS randomness and files are opened with create-new
/// semantics, so an existing asset is never overwritten. Replaced thumbnails
/// remain on disk as orphans.
#[derive(Clone, Debug)]
pub struct RandomFileStorage {
    assets: AssetsDir,
}

impl RandomFileStorage {
    /// # Arguments
    /// * `base_path` - Assets directory (e.g., "./assets"), created if absent
    /// * `base_url` - Public base URL (e.g., "http://localhost:8091")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        Ok(Self {
            assets: AssetsDir::new(base_path, base_url).await?,
        })
    }
}

#[async_trait]
impl ThumbnailStorage for RandomFileStorage {
    async fn put(&self, video_id: Uuid, image: &UploadedImage) -> StorageResult<String> {
        let name = filename(&random_key()?, image);
        let path = self.assets.name_to_path(&name)?;
        let start = Instant::now();

        self.assets.ensure_dir().await?;
        write_new_file(&path, &image.data).await?;

        tracing::info!(
            video_id = %video_id,
            path = %path.display(),
            size_bytes = image.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail written to random file"
        );

        Ok(self.assets.generate_url(&name))
    }

    fn backend_type(&self) -> ThumbnailBackend {
        ThumbnailBackend::RandomFile
    }
}

/// Video-id-name strategy: the file for a video is always `<video_id>.<ext>`.
///
/// A re-upload replaces the file atomically (temporary sibling + rename). If the
/// media type changes, the file with the previous extension is left in place.
#[derive(Clone, Debug)]
pub struct VideoIdFileStorage {
    assets: AssetsDir,
}

impl VideoIdFileStorage {
    /// # Arguments
    /// * `base_path` - Assets directory (e.g., "./assets"), created if absent
    /// * `base_url` - Public base URL (e.g., "http://localhost:8091")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        Ok(Self {
            assets: AssetsDir::new(base_path, base_url).await?,
        })
    }
}

#[async_trait]
impl ThumbnailStorage for VideoIdFileStorage {
    async fn put(&self, video_id: Uuid, image: &UploadedImage) -> StorageResult<String> {
        let name = video_filename(video_id, image);
        let path = self.assets.name_to_path(&name)?;
        let tmp_path = self
            .assets
            .base_path
            .join(format!(".{}.{}.tmp", name, random_key()?));
        let start = Instant::now();

        self.assets.ensure_dir().await?;
        write_new_file(&tmp_path, &image.data).await?;

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            if let Err(cleanup_err) = fs::remove_file(&tmp_path).await {
                tracing::warn!(
                    path = %tmp_path.display(),
                    error = %cleanup_err,
                    "Failed to remove temporary asset"
                );
            }
            return Err(StorageError::UploadFailed(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            video_id = %video_id,
            path = %path.display(),
            size_bytes = image.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail written to video id file"
        );

        Ok(self.assets.generate_url(&name))
    }

    fn backend_type(&self) -> ThumbnailBackend {
        ThumbnailBackend::VideoIdFile
    }
}
