use bytes::Bytes;

use crate::constants::JPEG_CONTENT_TYPE;

/// A user-supplied photo, exactly as picked from disk or camera.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub file_name: String,
    /// MIME type reported by the file picker; informational only, the decoder
    /// sniffs the real format from the bytes.
    pub content_type: String,
    pub data: Bytes,
}

impl RawImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A JPEG re-encoded from exactly one [`RawImage`], bounded to the pipeline's
/// maximum dimensions.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Original name with its extension replaced by `.jpg`
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

impl NormalizedImage {
    pub fn content_type(&self) -> &'static str {
        JPEG_CONTENT_TYPE
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Reference to one successfully uploaded evidence photo.
///
/// Produced once per upload and merged into exactly one outbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedEvidenceRef {
    public_url: String,
    storage_key: String,
}

impl UploadedEvidenceRef {
    pub fn new(public_url: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
            storage_key: storage_key.into(),
        }
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}
