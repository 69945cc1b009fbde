//! Supabase Storage backend.
//!
//! Talks to the Storage REST API of a Supabase project:
//! `POST {url}/storage/v1/object/{bucket}/{key}` to upload and
//! `{url}/storage/v1/object/public/{bucket}/{path}` to serve public objects.

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

const CACHE_CONTROL: &str = "max-age=3600";

/// Supabase Storage implementation
#[derive(Clone, Debug)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Create a new SupabaseStorage instance
    ///
    /// # Arguments
    /// * `base_url` - Project URL (e.g., "https://abcd.supabase.co")
    /// * `api_key` - Key sent as both `apikey` and bearer token
    /// * `bucket` - Bucket holding the evidence photos
    /// * `timeout` - Request timeout
    pub fn new(
        base_url: String,
        api_key: String,
        bucket: String,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(SupabaseStorage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
        })
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, storage_key
        )
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("apikey", self.api_key.as_str())
    }

    /// Path of the stored object relative to the bucket.
    ///
    /// The API answers `{ "Key": "{bucket}/{path}" }`; the requested key is used when
    /// the body does not carry one.
    fn stored_path(&self, body: &str, storage_key: &str) -> String {
        let bucket_prefix = format!("{}/", self.bucket);
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("Key").and_then(|k| k.as_str()).map(String::from))
            .map(|key| {
                key.strip_prefix(&bucket_prefix)
                    .map(String::from)
                    .unwrap_or(key)
            })
            .unwrap_or_else(|| storage_key.to_string())
    }
}

/// Extract the store's own message from an error body (`message`, then `error`).
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|field| {
                value
                    .get(*field)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.trim().is_empty())
                    .map(String::from)
            })
        })
        .unwrap_or_default()
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let size = data.len();
        let start = std::time::Instant::now();

        let request = self
            .client
            .post(self.object_url(storage_key))
            .header("Content-Type", content_type)
            .header("cache-control", CACHE_CONTROL)
            .header("x-upsert", "false")
            .body(data);
        let request = self.apply_auth(request);

        let response = request.send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                "Supabase upload request failed"
            );
            StorageError::BackendError(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = error_message(&body);
            tracing::error!(
                status = %status,
                error = %message,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Supabase upload failed"
            );
            return Err(StorageError::UploadFailed(message));
        }

        let path = self.stored_path(&body, storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        Ok(path)
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
