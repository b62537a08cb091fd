use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::video::VideoStore;

/// In-memory video store for tests and local runs without Postgres
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.videos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.videos.read().await.is_empty()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoRepository {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::InvalidInput(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos.get_mut(&video.id).ok_or_else(|| {
            AppError::UpdateConflict(format!("video {} no longer exists", video.id))
        })?;

        stored.title = video.title.clone();
        stored.description = video.description.clone();
        stored.thumbnail_url = video.thumbnail_url.clone();
        stored.video_url = video.video_url.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "boots", "a video about boots");

        repo.create_video(&video).await.unwrap();
        let fetched = repo.get_video(video.id).await.unwrap().unwrap();
        assert_eq!(fetched, video);
        assert!(repo.get_video(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "t", "d");
        repo.create_video(&video).await.unwrap();
        assert!(repo.create_video(&video).await.is_err());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_sets_thumbnail_and_bumps_updated_at() {
        let repo = InMemoryVideoRepository::new();
        let mut video = Video::new(Uuid::new_v4(), "t", "d");
        repo.create_video(&video).await.unwrap();

        video.thumbnail_url = Some("http://localhost:8091/assets/x.png".to_string());
        let updated = repo.update_video(&video).await.unwrap();

        assert_eq!(updated.thumbnail_url, video.thumbnail_url);
        assert!(updated.updated_at >= video.updated_at);
        assert_eq!(updated.owner_id, video.owner_id);
    }

    #[tokio::test]
    async fn test_update_never_changes_owner() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "t", "d");
        repo.create_video(&video).await.unwrap();

        let mut tampered = video.clone();
        tampered.owner_id = Uuid::new_v4();
        let updated = repo.update_video(&tampered).await.unwrap();
        assert_eq!(updated.owner_id, video.owner_id);
    }

    #[tokio::test]
    async fn test_update_missing_is_conflict() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "t", "d");
        let err = repo.update_video(&video).await.unwrap_err();
        assert!(matches!(err, AppError::UpdateConflict(_)));
    }
}
