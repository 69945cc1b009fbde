//! Seams of the orchestrator.

use async_trait::async_trait;
use fleet_api_client::{ApiClient, ApiError};
use fleet_core::{EvidenceError, EvidenceResult, SubmitMethod};
use serde_json::Value;

/// Sends a finished record to the backend.
///
/// Implemented by [`ApiClient`]; tests substitute recording fakes.
#[async_trait]
pub trait RecordSubmitter: Send + Sync {
    /// Submit `body` to the resolved `path` and return the server's response body.
    async fn submit(&self, method: SubmitMethod, path: &str, body: &Value)
        -> EvidenceResult<Value>;
}

/// Keep the status and the server's own message; transport and decode failures
/// carry neither and fall back to the generic text.
fn submission_error(err: ApiError) -> EvidenceError {
    EvidenceError::submission(err.status(), err.server_message().map(String::from))
}

#[async_trait]
impl RecordSubmitter for ApiClient {
    async fn submit(
        &self,
        method: SubmitMethod,
        path: &str,
        body: &Value,
    ) -> EvidenceResult<Value> {
        self.submit_record(method, path, body)
            .await
            .map_err(submission_error)
    }
}
