//! Local previews of normalized photos.
//!
//! A preview is an in-memory copy of the normalized JPEG addressed by an opaque
//! `blob:` URL. The registry only holds previews whose [`PreviewHandle`] is alive;
//! dropping the handle releases the bytes.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const PREVIEW_URL_PREFIX: &str = "blob:fleet-evidence/";

/// Shared store of live previews
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Mutex<HashMap<Uuid, Bytes>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, Bytes>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `data` and return the handle that keeps it alive.
    pub fn publish(&self, data: Bytes) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.entries().insert(id, data);
        tracing::debug!(preview_id = %id, "Preview published");

        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Bytes behind a preview URL, while its handle is alive.
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        let id = url
            .strip_prefix(PREVIEW_URL_PREFIX)
            .and_then(|id| Uuid::parse_str(id).ok())?;
        self.entries().get(&id).cloned()
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.entries().len()
    }

    fn release(&self, id: &Uuid) {
        if self.entries().remove(id).is_some() {
            tracing::debug!(preview_id = %id, "Preview released");
        }
    }
}

/// Owner of one published preview. Released on drop.
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> String {
        format!("{}{}", PREVIEW_URL_PREFIX, self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}
