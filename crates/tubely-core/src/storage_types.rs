use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Thumbnail storage strategies
///
/// Selected once at process start from `THUMBNAIL_STORAGE`. Defined in core because
/// both configuration and the storage factory need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailBackend {
    /// Process-wide table; lives for process uptime, no persistence, no eviction.
    Memory,
    /// `<assets>/<random>.<ext>`, never overwritten.
    RandomFile,
    /// `<assets>/<video_id>.<ext>`, overwritten in place on re-upload.
    VideoIdFile,
    /// `data:<media type>;base64,<payload>` stored on the record itself.
    DataUrl,
}

impl ThumbnailBackend {
    /// Whether assets of this backend live in the assets directory.
    pub fn is_file_backed(&self) -> bool {
        matches!(self, ThumbnailBackend::RandomFile | ThumbnailBackend::VideoIdFile)
    }
}

impl FromStr for ThumbnailBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "memory" | "in_memory" => Ok(ThumbnailBackend::Memory),
            "random_file" => Ok(ThumbnailBackend::RandomFile),
            "video_id_file" | "record_id_file" => Ok(ThumbnailBackend::VideoIdFile),
            "data_url" | "inline" => Ok(ThumbnailBackend::DataUrl),
            _ => Err(anyhow::anyhow!("Invalid thumbnail storage backend: {}", s)),
        }
    }
}

impl Display for ThumbnailBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailBackend::Memory => write!(f, "memory"),
            ThumbnailBackend::RandomFile => write!(f, "random_file"),
            ThumbnailBackend::VideoIdFile => write!(f, "video_id_file"),
            ThumbnailBackend::DataUrl => write!(f, "data_url"),
        }
    }
}
