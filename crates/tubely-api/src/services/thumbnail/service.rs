//! Thumbnail upload orchestration
//!
//! Each step either advances or ends the request with a single `AppError`:
//!
//! 1. authenticate: bearer token -> user id
//! 2. authorize: load the video, caller must own it
//! 3. decode: read the `thumbnail` part under the upload limits
//! 4. store: hand the image to the configured backend, get a URL back
//! 5. persist: point the video's `thumbnail_url` at that URL
//!
//! Nothing is written to storage before step 4 and nothing is written to the
//! video store before step 5, so a request rejected early leaves no trace.

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::http::HeaderMap;
use tubely_core::{AppError, UploadedImage, Video};
use tubely_db::VideoStore;
use tubely_storage::ThumbnailStorage;
use uuid::Uuid;

use super::decoder::{decode_thumbnail, UploadLimits};
use crate::auth::{extract_bearer_token, TokenVerifier};
use crate::error::storage_error;
use crate::state::AppState;

pub struct ThumbnailUploadService {
    verifier: Arc<dyn TokenVerifier>,
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn ThumbnailStorage>,
    limits: UploadLimits,
}

impl ThumbnailUploadService {
    pub fn new(state: &AppState) -> Self {
        Self::with_parts(
            state.verifier.clone(),
            state.videos.clone(),
            state.storage.storage.clone(),
            state.upload_limits.clone(),
        )
    }

    pub fn with_parts(
        verifier: Arc<dyn TokenVerifier>,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn ThumbnailStorage>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            verifier,
            videos,
            storage,
            limits,
        }
    }

    /// Run the full upload and return the updated video record
    ///
    /// `multipart` is the extractor outcome as axum produced it. A body that is
    /// not a multipart form only surfaces once the caller has been authenticated
    /// and authorized.
    pub async fn upload(
        &self,
        video_id: Uuid,
        headers: &HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Video, AppError> {
        let user_id = self.authenticate(headers)?;
        let mut video = self.authorize(video_id, user_id).await?;

        let multipart = multipart.map_err(|e| AppError::ReadFailure(e.body_text()))?;
        let image = decode_thumbnail(multipart, &self.limits).await?;
        tracing::info!(
            video_id = %video_id,
            user_id = %user_id,
            media_type = %image.media_type,
            size_bytes = image.size(),
            "Uploading thumbnail"
        );

        let url = self.store(video_id, &image).await?;
        video.thumbnail_url = Some(url);

        self.persist(&video).await
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AppError> {
        let token = extract_bearer_token(headers)?;
        self.verifier.verify(token)
    }

    async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or(AppError::RecordNotFound(video_id))?;

        if !video.is_owned_by(user_id) {
            return Err(AppError::OwnershipMismatch { video_id, user_id });
        }

        Ok(video)
    }

    async fn store(&self, video_id: Uuid, image: &UploadedImage) -> Result<String, AppError> {
        self.storage.put(video_id, image).await.map_err(|e| {
            tracing::error!(
                video_id = %video_id,
                backend = %self.storage.backend_type(),
                error = %e,
                "Thumbnail storage failed"
            );
            storage_error(e)
        })
    }

    async fn persist(&self, video: &Video) -> Result<Video, AppError> {
        match self.videos.update_video(video).await {
            Ok(updated) => {
                tracing::info!(
                    video_id = %updated.id,
                    thumbnail_url_len = updated.thumbnail_url.as_deref().map_or(0, str::len),
                    "Thumbnail URL saved"
                );
                Ok(updated)
            }
            Err(AppError::UpdateConflict(msg)) => Err(AppError::UpdateConflict(msg)),
            Err(other) => Err(AppError::UpdateConflict(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtVerifier;
    use crate::services::thumbnail::decoder::test_support::{
        multipart_from_parts, plain_text_rejection, thumbnail_form,
    };
    use async_trait::async_trait;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tubely_core::ThumbnailBackend;
    use tubely_db::InMemoryVideoRepository;
    use tubely_storage::{MemoryThumbnailStorage, StorageError, StorageResult};

    const SECRET: &str = "service-test-secret-0123456789abcdef";

    #[derive(Default)]
    struct CountingStorage {
        puts: AtomicUsize,
    }

    #[async_trait]
    impl ThumbnailStorage for CountingStorage {
        async fn put(&self, video_id: Uuid, _image: &UploadedImage) -> StorageResult<String> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Ok(format!("http://localhost:8091/assets/{}.png", video_id))
        }

        fn backend_type(&self) -> ThumbnailBackend {
            ThumbnailBackend::VideoIdFile
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl ThumbnailStorage for FailingStorage {
        async fn put(&self, _video_id: Uuid, _image: &UploadedImage) -> StorageResult<String> {
            Err(StorageError::UploadFailed("disk full".to_string()))
        }

        fn backend_type(&self) -> ThumbnailBackend {
            ThumbnailBackend::RandomFile
        }
    }

    /// Reads through to the inner repository but refuses every update
    struct ReadOnlyVideos(InMemoryVideoRepository);

    #[async_trait]
    impl VideoStore for ReadOnlyVideos {
        async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
            self.0.create_video(video).await
        }

        async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
            self.0.get_video(id).await
        }

        async fn update_video(&self, _video: &Video) -> Result<Video, AppError> {
            Err(AppError::Internal("connection reset".to_string()))
        }
    }

    struct Fixture {
        verifier: Arc<JwtVerifier>,
        videos: InMemoryVideoRepository,
        owner: Uuid,
        video: Video,
    }

    async fn fixture() -> Fixture {
        let videos = InMemoryVideoRepository::new();
        let owner = Uuid::new_v4();
        let video = Video::new(owner, "boots", "a video about boots");
        videos.create_video(&video).await.unwrap();

        Fixture {
            verifier: Arc::new(JwtVerifier::new(SECRET)),
            videos,
            owner,
            video,
        }
    }

    fn limits() -> UploadLimits {
        UploadLimits::new(
            1024 * 1024,
            vec!["image/jpeg".to_string(), "image/png".to_string()],
        )
    }

    fn bearer(verifier: &JwtVerifier, user_id: Uuid) -> HeaderMap {
        let token = verifier.issue(user_id, chrono::Duration::hours(1)).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    fn service(
        fx: &Fixture,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn ThumbnailStorage>,
    ) -> ThumbnailUploadService {
        ThumbnailUploadService::with_parts(fx.verifier.clone(), videos, storage, limits())
    }

    #[tokio::test]
    async fn test_upload_sets_thumbnail_url() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(&fx, Arc::new(fx.videos.clone()), storage.clone());

        let form = thumbnail_form("image/png", b"png-bytes").await;
        let updated = svc
            .upload(fx.video.id, &bearer(&fx.verifier, fx.owner), Ok(form))
            .await
            .unwrap();

        let expected = format!("http://localhost:8091/assets/{}.png", fx.video.id);
        assert_eq!(updated.thumbnail_url.as_deref(), Some(expected.as_str()));
        assert_eq!(updated.owner_id, fx.owner);
        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);

        let stored = fx.videos.get_video(fx.video.id).await.unwrap().unwrap();
        assert_eq!(stored.thumbnail_url, updated.thumbnail_url);
    }

    #[tokio::test]
    async fn test_memory_backend_holds_uploaded_bytes() {
        let fx = fixture().await;
        let memory = MemoryThumbnailStorage::new("http://localhost:8091");
        let svc = service(&fx, Arc::new(fx.videos.clone()), Arc::new(memory.clone()));

        let form = thumbnail_form("image/jpeg", b"jpeg-bytes").await;
        let updated = svc
            .upload(fx.video.id, &bearer(&fx.verifier, fx.owner), Ok(form))
            .await
            .unwrap();

        assert_eq!(
            updated.thumbnail_url,
            Some(format!("http://localhost:8091/api/thumbnails/{}", fx.video.id))
        );
        let stored = memory.get(fx.video.id).await.unwrap();
        assert_eq!(&stored.data[..], b"jpeg-bytes");
        assert_eq!(stored.media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_token_stops_before_storage() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(&fx, Arc::new(fx.videos.clone()), storage.clone());

        let form = thumbnail_form("image/png", b"png").await;
        let err = svc
            .upload(fx.video.id, &HeaderMap::new(), Ok(form))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthHeaderMissing));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_token_stops_before_storage() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(&fx, Arc::new(fx.videos.clone()), storage.clone());

        let forged = JwtVerifier::new("some-other-secret-0123456789abcdef");
        let form = thumbnail_form("image/png", b"png").await;
        let err = svc
            .upload(fx.video.id, &bearer(&forged, fx.owner), Ok(form))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidToken(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_video_is_not_found() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(&fx, Arc::new(fx.videos.clone()), storage.clone());

        let missing = Uuid::new_v4();
        let form = thumbnail_form("image/png", b"png").await;
        let err = svc
            .upload(missing, &bearer(&fx.verifier, fx.owner), Ok(form))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RecordNotFound(id) if id == missing));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_owner_is_rejected_without_side_effects() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(&fx, Arc::new(fx.videos.clone()), storage.clone());

        let intruder = Uuid::new_v4();
        let form = thumbnail_form("image/png", b"png").await;
        let err = svc
            .upload(fx.video.id, &bearer(&fx.verifier, intruder), Ok(form))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::OwnershipMismatch { user_id, .. } if user_id == intruder));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);

        let stored = fx.videos.get_video(fx.video.id).await.unwrap().unwrap();
        assert!(stored.thumbnail_url.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_form_is_checked_after_credentials() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(&fx, Arc::new(fx.videos.clone()), storage.clone());

        let err = svc
            .upload(fx.video.id, &HeaderMap::new(), Err(plain_text_rejection().await))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthHeaderMissing));

        let err = svc
            .upload(
                fx.video.id,
                &bearer(&fx.verifier, fx.owner),
                Err(plain_text_rejection().await),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ReadFailure(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_decode_failure_stops_before_storage() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(&fx, Arc::new(fx.videos.clone()), storage.clone());

        let form = multipart_from_parts(&[("file", Some("image/png"), &b"png"[..])]).await;
        let err = svc
            .upload(fx.video.id, &bearer(&fx.verifier, fx.owner), Ok(form))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingField(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_record_untouched() {
        let fx = fixture().await;
        let svc = service(&fx, Arc::new(fx.videos.clone()), Arc::new(FailingStorage));

        let form = thumbnail_form("image/png", b"png").await;
        let err = svc
            .upload(fx.video.id, &bearer(&fx.verifier, fx.owner), Ok(form))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StorageFailure(_)));
        let stored = fx.videos.get_video(fx.video.id).await.unwrap().unwrap();
        assert!(stored.thumbnail_url.is_none());
    }

    #[tokio::test]
    async fn test_update_failure_is_conflict() {
        let fx = fixture().await;
        let storage = Arc::new(CountingStorage::default());
        let svc = service(
            &fx,
            Arc::new(ReadOnlyVideos(fx.videos.clone())),
            storage.clone(),
        );

        let form = thumbnail_form("image/png", b"png").await;
        let err = svc
            .upload(fx.video.id, &bearer(&fx.verifier, fx.owner), Ok(form))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpdateConflict(_)));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);
    }
}
