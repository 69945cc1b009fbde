//! Upload coordinator: stores a normalized photo and resolves its public URL.

use fleet_core::{EvidenceError, EvidenceResult, NormalizedImage, UploadedEvidenceRef};
use fleet_storage::{new_evidence_key, Storage};
use std::sync::Arc;

/// Uploads normalized evidence photos to the configured backend.
#[derive(Clone)]
pub struct EvidenceUploader {
    storage: Arc<dyn Storage>,
}

impl EvidenceUploader {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Store `image` under a fresh `public/{category}-...` key.
    ///
    /// Every call generates a new key; nothing is cleaned up when a later step fails.
    pub async fn upload(
        &self,
        image: &NormalizedImage,
        category: &str,
    ) -> EvidenceResult<UploadedEvidenceRef> {
        let key = new_evidence_key(category);
        let start = std::time::Instant::now();

        let path = self
            .storage
            .upload(&key, image.content_type(), image.data.clone())
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    backend = %self.storage.backend_type(),
                    key = %key,
                    "Evidence upload failed"
                );
                EvidenceError::storage(e.store_message().unwrap_or_default())
            })?;

        let public_url = self.storage.public_url(&path);

        tracing::info!(
            backend = %self.storage.backend_type(),
            key = %path,
            size_bytes = image.size(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Evidence uploaded"
        );

        Ok(UploadedEvidenceRef::new(public_url, path))
    }
}
