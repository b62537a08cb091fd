#[cfg(feature = "storage-local")]
use crate::{RandomFileStorage, VideoIdFileStorage};
use crate::{
    DataUrlStorage, MemoryThumbnailStorage, StorageResult, ThumbnailBackend, ThumbnailStorage,
};
#[cfg(not(feature = "storage-local"))]
use crate::StorageError;
use std::sync::Arc;
use tubely_core::Config;

/// The configured backend plus, for the memory backend, the table it writes to.
///
/// The table handle is what the thumbnail retrieval route reads from; it is
/// `None` for every other backend.
#[derive(Clone)]
pub struct StorageHandles {
    pub storage: Arc<dyn ThumbnailStorage>,
    pub memory: Option<MemoryThumbnailStorage>,
}

impl StorageHandles {
    pub fn backend_type(&self) -> ThumbnailBackend {
        self.storage.backend_type()
    }
}

/// Create the thumbnail storage backend selected by configuration
pub async fn create_storage(config: &Config) -> StorageResult<StorageHandles> {
    let thumbnails = &config.thumbnails;
    let base_url = thumbnails.public_base_url.clone();

    let handles = match thumbnails.backend {
        ThumbnailBackend::Memory => {
            let memory = MemoryThumbnailStorage::new(base_url);
            StorageHandles {
                storage: Arc::new(memory.clone()),
                memory: Some(memory),
            }
        }

        #[cfg(feature = "storage-local")]
        ThumbnailBackend::RandomFile => StorageHandles {
            storage: Arc::new(RandomFileStorage::new(&thumbnails.assets_root, base_url).await?),
            memory: None,
        },

        #[cfg(feature = "storage-local")]
        ThumbnailBackend::VideoIdFile => StorageHandles {
            storage: Arc::new(VideoIdFileStorage::new(&thumbnails.assets_root, base_url).await?),
            memory: None,
        },

        #[cfg(not(feature = "storage-local"))]
        ThumbnailBackend::RandomFile | ThumbnailBackend::VideoIdFile => {
            return Err(StorageError::ConfigError(
                "File storage backends not available (storage-local feature not enabled)"
                    .to_string(),
            ))
        }

        ThumbnailBackend::DataUrl => StorageHandles {
            storage: Arc::new(DataUrlStorage::new()),
            memory: None,
        },
    };

    tracing::info!(backend = %handles.backend_type(), "Thumbnail storage initialized");

    Ok(handles)
}
