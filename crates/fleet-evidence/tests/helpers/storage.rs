use super::{Event, EventLog};
use async_trait::async_trait;
use bytes::Bytes;
use fleet_core::StorageBackend;
use fleet_storage::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

pub const PUBLIC_BASE_URL: &str = "https://storage.test/fleet-evidence-photos";

/// In-memory object store that can be told to reject uploads.
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    reject_with: Mutex<Option<String>>,
    events: EventLog,
}

impl MemoryStorage {
    pub fn new(events: EventLog) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            reject_with: Mutex::new(None),
            events,
        }
    }

    /// Reject every following upload with `message` (empty for no message).
    pub fn reject_uploads(&self, message: &str) {
        *self.reject_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn accept_uploads(&self) {
        *self.reject_with.lock().unwrap() = None;
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(
        &self,
        storage_key: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        if let Some(message) = self.reject_with.lock().unwrap().clone() {
            return Err(StorageError::UploadFailed(message));
        }

        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(storage_key) {
            return Err(StorageError::UploadFailed(
                "The resource already exists".to_string(),
            ));
        }
        objects.insert(storage_key.to_string(), data);

        self.events.lock().unwrap().push(Event::Upload {
            key: storage_key.to_string(),
        });
        Ok(storage_key.to_string())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", PUBLIC_BASE_URL, path)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
