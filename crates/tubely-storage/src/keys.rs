//! Shared key and URL generation for storage backends.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, TryRngCore};
use tubely_core::UploadedImage;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Bytes of OS randomness per random key (256 bits).
pub const RANDOM_KEY_BYTES: usize = 32;

/// Generate a URL-safe random key from the OS CSPRNG.
pub fn random_key() -> StorageResult<String> {
    let mut buf = [0u8; RANDOM_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| StorageError::KeyGeneration(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// `<key>.<ext>` with the extension derived from the image media type.
pub fn filename(key: &str, image: &UploadedImage) -> String {
    format!("{}.{}", key, image.extension())
}

pub fn video_filename(video_id: Uuid, image: &UploadedImage) -> String {
    filename(&video_id.to_string(), image)
}

/// Join a base URL and a path, tolerating a trailing slash on the base.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
