//! Test helpers: in-memory collaborators and a ready-made capture context.
//!
//! Storage and submitter share one event log so tests can assert the order in
//! which the flow touched them.

pub mod fixtures;
pub mod storage;
pub mod submitter;

use fleet_evidence::CaptureContext;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use storage::MemoryStorage;
use submitter::RecordingSubmitter;

/// One observable side effect of a capture flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Upload {
        key: String,
    },
    Submit {
        method: fleet_core::SubmitMethod,
        path: String,
        body: Value,
    },
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Capture context wired to in-memory fakes.
pub struct TestHarness {
    pub context: CaptureContext,
    pub storage: Arc<MemoryStorage>,
    pub submitter: Arc<RecordingSubmitter>,
    pub events: EventLog,
}

impl TestHarness {
    pub fn new() -> Self {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let storage = Arc::new(MemoryStorage::new(events.clone()));
        let submitter = Arc::new(RecordingSubmitter::new(events.clone()));
        let context = CaptureContext::new(storage.clone(), submitter.clone());

        Self {
            context,
            storage,
            submitter,
            events,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Submit { .. }))
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
