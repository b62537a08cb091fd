use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tubely_core::constants::THUMBNAILS_ROUTE;
use tubely_core::{ThumbnailBackend, UploadedImage};
use uuid::Uuid;

use crate::keys::join_url;
use crate::traits::{StorageResult, ThumbnailStorage};

/// A thumbnail held in the in-memory table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredThumbnail {
    pub data: Bytes,
    pub media_type: String,
}

/// In-memory thumbnail table keyed by video id.
///
/// Entries live for process uptime: nothing is persisted across restarts and
/// nothing is evicted. Storing under an existing id replaces the previous entry.
/// Clones share the same table.
#[derive(Clone)]
pub struct MemoryThumbnailStorage {
    entries: Arc<RwLock<HashMap<Uuid, StoredThumbnail>>>,
    base_url: String,
}

impl MemoryThumbnailStorage {
    /// # Arguments
    /// * `base_url` - Public base URL (e.g., "http://localhost:8091")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            base_url: base_url.into(),
        }
    }

    /// Look up the current thumbnail for a video.
    pub async fn get(&self, video_id: Uuid) -> Option<StoredThumbnail> {
        self.entries.read().await.get(&video_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn generate_url(&self, video_id: Uuid) -> String {
        join_url(
            &self.base_url,
            &format!("{}/{}", THUMBNAILS_ROUTE, video_id),
        )
    }
}

#[async_trait]
impl ThumbnailStorage for MemoryThumbnailStorage {
    async fn put(&self, video_id: Uuid, image: &UploadedImage) -> StorageResult<String> {
        let entry = StoredThumbnail {
            data: image.data.clone(),
            media_type: image.media_type.clone(),
        };

        let replaced = self.entries.write().await.insert(video_id, entry).is_some();

        tracing::info!(
            video_id = %video_id,
            media_type = %image.media_type,
            size_bytes = image.size(),
            replaced,
            "Thumbnail stored in memory"
        );

        Ok(self.generate_url(video_id))
    }

    fn backend_type(&self) -> ThumbnailBackend {
        ThumbnailBackend::Memory
    }
}
