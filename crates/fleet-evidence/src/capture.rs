//! Confirmation orchestrator.
//!
//! One [`EvidenceCapture`] drives one record from photo selection to submission.
//! Every step takes `&mut self`, so a flow cannot run two steps at once and no
//! step can outlive the flow that started it. Step errors never escape: they
//! become [`CaptureState::Failed`].

use crate::context::CaptureContext;
use crate::preview::PreviewHandle;
use fleet_core::{
    ErrorMetadata, EvidenceError, EvidencePayload, EvidenceResult, LogLevel, NormalizedImage,
    RawImage, SubmitTarget,
};
use serde_json::Value;

type SuccessCallback = Box<dyn FnOnce(&Value) + Send + Sync>;

/// Where a capture flow currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    /// Nothing selected yet
    Idle,
    /// A picked photo is being normalized
    Processing,
    /// A normalized photo and its preview are ready
    ReadyToConfirm {
        preview_url: String,
        width: u32,
        height: u32,
    },
    /// Uploading the photo and submitting the record
    Submitting,
    /// The backend accepted the record; terminal
    Succeeded { response: Value },
    /// The last step failed; `message` and `suggested_action` are meant for the user
    Failed {
        message: String,
        error_code: &'static str,
        suggested_action: Option<&'static str>,
        can_retry: bool,
    },
}

impl CaptureState {
    pub fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Processing => "processing",
            CaptureState::ReadyToConfirm { .. } => "ready_to_confirm",
            CaptureState::Submitting => "submitting",
            CaptureState::Succeeded { .. } => "succeeded",
            CaptureState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CaptureState::Succeeded { .. })
    }
}

/// State machine for one evidence-backed record.
pub struct EvidenceCapture {
    context: CaptureContext,
    payload: EvidencePayload,
    target: SubmitTarget,
    state: CaptureState,
    image: Option<NormalizedImage>,
    preview: Option<PreviewHandle>,
    on_success: Option<SuccessCallback>,
}

impl EvidenceCapture {
    pub fn new(context: CaptureContext, payload: EvidencePayload, target: SubmitTarget) -> Self {
        Self {
            context,
            payload,
            target,
            state: CaptureState::Idle,
            image: None,
            preview: None,
            on_success: None,
        }
    }

    /// Called once with the server's response body when the record is accepted.
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&Value) + Send + Sync + 'static,
    {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn payload(&self) -> &EvidencePayload {
        &self.payload
    }

    pub fn target(&self) -> &SubmitTarget {
        &self.target
    }

    pub fn normalized_image(&self) -> Option<&NormalizedImage> {
        self.image.as_ref()
    }

    pub fn preview_url(&self) -> Option<String> {
        self.preview.as_ref().map(PreviewHandle::url)
    }

    /// Normalize a newly picked photo and publish its preview.
    ///
    /// Any earlier photo and preview are discarded first. Ignored once the flow
    /// has succeeded.
    pub async fn select(&mut self, raw: RawImage) -> &CaptureState {
        if self.state.is_terminal() {
            tracing::debug!(kind = %self.payload.kind(), "Selection ignored after success");
            return &self.state;
        }

        self.preview = None;
        self.image = None;
        self.transition(CaptureState::Processing);

        tracing::info!(
            kind = %self.payload.kind(),
            file_name = %raw.file_name,
            size_bytes = raw.size(),
            "Normalizing evidence photo"
        );

        match self.context.normalizer.normalize(raw).await {
            Ok(image) => {
                let preview = self.context.previews.publish(image.data.clone());
                self.transition(CaptureState::ReadyToConfirm {
                    preview_url: preview.url(),
                    width: image.width,
                    height: image.height,
                });
                self.preview = Some(preview);
                self.image = Some(image);
            }
            Err(err) => self.fail(err),
        }

        &self.state
    }

    /// Upload the photo, attach its URL to the record and submit the record.
    ///
    /// Allowed from `ReadyToConfirm`, or from `Failed` while a normalized photo is
    /// still held. Otherwise the call is rejected and the state is left as it was.
    pub async fn confirm(&mut self) -> &CaptureState {
        if self.state.is_terminal() {
            tracing::debug!(kind = %self.payload.kind(), "Confirmation ignored after success");
            return &self.state;
        }

        let Some(image) = self.image.clone() else {
            tracing::debug!(
                kind = %self.payload.kind(),
                state = self.state.name(),
                "Confirmation rejected: no photo selected"
            );
            return &self.state;
        };

        self.transition(CaptureState::Submitting);

        match self.upload_and_submit(&image).await {
            Ok(response) => {
                if let Some(callback) = self.on_success.take() {
                    callback(&response);
                }
                self.transition(CaptureState::Succeeded { response });
            }
            Err(err) => self.fail(err),
        }

        &self.state
    }

    /// Drop the flow without submitting. Previews are released.
    pub fn abandon(self) {
        tracing::info!(
            kind = %self.payload.kind(),
            state = self.state.name(),
            "Evidence capture abandoned"
        );
    }

    async fn upload_and_submit(&self, image: &NormalizedImage) -> EvidenceResult<Value> {
        // The endpoint is checked before anything reaches the store
        let path = self.target.resolve_path()?;
        let kind = self.payload.kind();

        let evidence = self
            .context
            .uploader
            .upload(image, kind.storage_category())
            .await?;

        let mut payload = self.payload.clone();
        payload.attach_photo(&evidence);
        let body = payload.to_body()?;

        tracing::info!(
            kind = %kind,
            method = self.target.method.as_http_method(),
            path = %path,
            photo_field = kind.photo_field(),
            "Submitting record"
        );

        self.context
            .submitter
            .submit(self.target.method, &path, &body)
            .await
    }

    fn fail(&mut self, err: EvidenceError) {
        match err.log_level() {
            LogLevel::Debug => tracing::debug!(
                error = %err,
                error_type = err.error_type(),
                kind = %self.payload.kind(),
                "Evidence capture step failed"
            ),
            LogLevel::Warn => tracing::warn!(
                error = %err,
                error_type = err.error_type(),
                kind = %self.payload.kind(),
                "Evidence capture step failed"
            ),
            LogLevel::Error => tracing::error!(
                error = %err,
                error_type = err.error_type(),
                kind = %self.payload.kind(),
                "Evidence capture step failed"
            ),
        }

        if self.image.is_none() {
            self.preview = None;
        }

        self.transition(CaptureState::Failed {
            message: err.client_message(),
            error_code: err.error_code(),
            suggested_action: err.suggested_action(),
            can_retry: self.image.is_some() && err.is_recoverable(),
        });
    }

    fn transition(&mut self, next: CaptureState) {
        tracing::debug!(
            kind = %self.payload.kind(),
            from = self.state.name(),
            to = next.name(),
            "Capture state changed"
        );
        self.state = next;
    }
}

impl std::fmt::Debug for EvidenceCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceCapture")
            .field("kind", &self.payload.kind())
            .field("target", &self.target)
            .field("state", &self.state)
            .field("preview", &self.preview)
            .finish()
    }
}
