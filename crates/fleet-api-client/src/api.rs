//! Record submission methods for the fleet backend API.

use crate::{ApiClient, ApiError};
use fleet_core::SubmitMethod;
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    /// Submit a record body to a resolved endpoint path.
    ///
    /// `Create` is sent as `POST`, `Update` as `PUT`. The server body is returned
    /// verbatim.
    pub async fn submit_record(
        &self,
        method: SubmitMethod,
        path: &str,
        body: &Value,
    ) -> Result<Value, ApiError> {
        let http_method = match method {
            SubmitMethod::Create => Method::POST,
            SubmitMethod::Update => Method::PUT,
        };
        self.send_json(http_method, path, body).await
    }
}
