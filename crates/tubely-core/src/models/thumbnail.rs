use bytes::Bytes;

/// Validated image bytes extracted from an upload request.
///
/// Transient: built per request by the upload decoder and dropped once stored or
/// rejected. The media type is the declared one, already normalized and checked
/// against the allow-list; the bytes themselves are not sniffed.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Bytes,
    pub media_type: String,
}

impl UploadedImage {
    pub fn new(data: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File extension derived from the media subtype (`image/png` -> `png`).
    ///
    /// A structured syntax suffix is dropped (`image/svg+xml` -> `svg`) and only
    /// ASCII alphanumerics are kept, so the result is always safe in a filename.
    pub fn extension(&self) -> String {
        let subtype = self
            .media_type
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or("");
        let subtype = subtype.split('+').next().unwrap_or(subtype);
        let ext: String = subtype
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        if ext.is_empty() {
            "bin".to_string()
        } else {
            ext
        }
    }
}
