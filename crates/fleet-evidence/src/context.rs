//! Session-wide collaborators shared by every capture flow.

use crate::capture::EvidenceCapture;
use crate::preview::PreviewRegistry;
use crate::traits::RecordSubmitter;
use crate::uploader::EvidenceUploader;
use anyhow::{Context, Result};
use fleet_api_client::ApiClient;
use fleet_core::{EvidenceConfig, EvidencePayload, SubmitTarget};
use fleet_processing::ImageNormalizer;
use fleet_storage::{create_storage, Storage};
use std::sync::Arc;

/// Normalizer, uploader, backend client and preview registry for one session.
///
/// Built once after login and cloned cheaply into each flow.
#[derive(Clone)]
pub struct CaptureContext {
    pub(crate) normalizer: ImageNormalizer,
    pub(crate) uploader: EvidenceUploader,
    pub(crate) submitter: Arc<dyn RecordSubmitter>,
    pub(crate) previews: PreviewRegistry,
}

impl CaptureContext {
    pub fn new(storage: Arc<dyn Storage>, submitter: Arc<dyn RecordSubmitter>) -> Self {
        Self {
            normalizer: ImageNormalizer::default(),
            uploader: EvidenceUploader::new(storage),
            submitter,
            previews: PreviewRegistry::new(),
        }
    }

    /// Build the storage backend and the authenticated API client from configuration.
    pub async fn from_config(config: &EvidenceConfig) -> Result<Self> {
        let storage = create_storage(config)
            .await
            .context("Failed to initialize evidence storage")?;
        let client = ApiClient::from_config(config)?;

        tracing::info!(
            backend = %storage.backend_type(),
            bucket = %config.bucket,
            api_url = %client.base_url(),
            "Evidence capture context ready"
        );

        Ok(Self::new(storage, Arc::new(client))
            .with_normalizer(ImageNormalizer::from_config(config)))
    }

    pub fn with_normalizer(mut self, normalizer: ImageNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Start a new flow for one record.
    pub fn capture(&self, payload: EvidencePayload, target: SubmitTarget) -> EvidenceCapture {
        EvidenceCapture::new(self.clone(), payload, target)
    }
}
