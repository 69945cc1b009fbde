//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// The message reported by the store itself, if it sent one.
    ///
    /// An upload rejected without a body yields `None` so callers can fall back
    /// to a generic text.
    pub fn store_message(&self) -> Option<String> {
        let message = match self {
            StorageError::UploadFailed(msg)
            | StorageError::NotFound(msg)
            | StorageError::InvalidKey(msg)
            | StorageError::BackendError(msg)
            | StorageError::ConfigError(msg) => msg.clone(),
            StorageError::IoError(e) => e.to_string(),
        };

        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (Supabase, S3, local filesystem) must implement this trait.
/// The upload coordinator only talks to this trait, so it works with any backend
/// without coupling to specific implementation details.
///
/// **Key format:** `public/{category}-{epoch_millis}-{suffix}.jpg`. See the crate
/// root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `storage_key` and return the path the store assigned.
    ///
    /// Existing objects are never overwritten.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Publicly reachable URL for a path returned by [`Storage::upload`].
    fn public_url(&self, path: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_message_keeps_backend_text() {
        let err = StorageError::UploadFailed("The resource already exists".to_string());
        assert_eq!(
            err.store_message().as_deref(),
            Some("The resource already exists")
        );
        assert_eq!(err.to_string(), "Upload failed: The resource already exists");
    }

    #[test]
    fn test_store_message_empty_is_none() {
        assert!(StorageError::UploadFailed(String::new())
            .store_message()
            .is_none());
        assert!(StorageError::BackendError("   ".to_string())
            .store_message()
            .is_none());
    }
}
