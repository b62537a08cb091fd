use std::sync::Arc;

use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_storage::StorageHandles;

use crate::auth::TokenVerifier;
use crate::services::thumbnail::UploadLimits;

/// Shared application state
///
/// Collaborators sit behind trait objects so the server can run against Postgres
/// and tests against the in-memory repository without changing the handlers.
pub struct AppState {
    pub videos: Arc<dyn VideoStore>,
    pub storage: StorageHandles,
    pub verifier: Arc<dyn TokenVerifier>,
    pub upload_limits: UploadLimits,
}

impl AppState {
    pub fn new(
        config: &Config,
        videos: Arc<dyn VideoStore>,
        storage: StorageHandles,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        let upload_limits = UploadLimits::from_config(config);
        Self {
            videos,
            storage,
            verifier,
            upload_limits,
        }
    }
}
