use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tubely_core::{ThumbnailBackend, UploadedImage};
use uuid::Uuid;

use crate::traits::{StorageResult, ThumbnailStorage};

/// Inline strategy: the returned URL is the asset.
///
/// Produces `data:<media type>;base64,<payload>`. Nothing is stored anywhere
/// else, so the video record grows with the image.
#[derive(Clone, Debug, Default)]
pub struct DataUrlStorage;

impl DataUrlStorage {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(image: &UploadedImage) -> String {
        format!(
            "data:{};base64,{}",
            image.media_type,
            STANDARD.encode(&image.data)
        )
    }
}

#[async_trait]
impl ThumbnailStorage for DataUrlStorage {
    async fn put(&self, video_id: Uuid, image: &UploadedImage) -> StorageResult<String> {
        let url = Self::encode(image);

        tracing::info!(
            video_id = %video_id,
            media_type = %image.media_type,
            size_bytes = image.size(),
            url_len = url.len(),
            "Thumbnail encoded as data URL"
        );

        Ok(url)
    }

    fn backend_type(&self) -> ThumbnailBackend {
        ThumbnailBackend::DataUrl
    }
}
