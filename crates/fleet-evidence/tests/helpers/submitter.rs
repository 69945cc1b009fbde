use super::{Event, EventLog};
use async_trait::async_trait;
use fleet_core::{EvidenceError, EvidenceResult, SubmitMethod};
use fleet_evidence::RecordSubmitter;
use serde_json::{json, Value};
use std::sync::Mutex;

/// How the fake backend answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Accept(Value),
    Reject {
        status: Option<u16>,
        message: Option<String>,
    },
}

/// Backend fake that records every submission in the shared event log.
pub struct RecordingSubmitter {
    reply: Mutex<Reply>,
    events: EventLog,
}

impl RecordingSubmitter {
    pub fn new(events: EventLog) -> Self {
        Self {
            reply: Mutex::new(Reply::Accept(json!({"id": 1}))),
            events,
        }
    }

    pub fn reply_with(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }
}

#[async_trait]
impl RecordSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        method: SubmitMethod,
        path: &str,
        body: &Value,
    ) -> EvidenceResult<Value> {
        self.events.lock().unwrap().push(Event::Submit {
            method,
            path: path.to_string(),
            body: body.clone(),
        });

        match self.reply.lock().unwrap().clone() {
            Reply::Accept(response) => Ok(response),
            Reply::Reject { status, message } => Err(EvidenceError::submission(status, message)),
        }
    }
}
