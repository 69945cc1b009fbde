//! Error types module
//!
//! Every failure of the evidence pipeline is one of the [`EvidenceError`] variants.
//! The orchestrator turns them into a failed state carrying
//! [`ErrorMetadata::client_message`], so the text produced here is what the user sees.

/// Shown when the object store failed without a message of its own.
pub const GENERIC_STORAGE_MESSAGE: &str = "Failed to upload the photo. Please try again.";

/// Shown when the backend rejected a record without `error`/`message` in its body.
pub const GENERIC_SUBMISSION_MESSAGE: &str = "Failed to save the record. Please try again.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a wrong file choice
    Debug,
    /// Warning level - for recoverable remote failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the same action can be retried by the user
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// Human-readable message for inline display
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Storage error: {}", .message.as_deref().unwrap_or(GENERIC_STORAGE_MESSAGE))]
    Storage { message: Option<String> },

    #[error(
        "Submission error{}: {}",
        .status.map(|s| format!(" (status {})", s)).unwrap_or_default(),
        .message.as_deref().unwrap_or(GENERIC_SUBMISSION_MESSAGE)
    )]
    Submission {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for the evidence pipeline
pub type EvidenceResult<T> = Result<T, EvidenceError>;

impl EvidenceError {
    /// Storage failure, keeping the store's message only when it has content.
    pub fn storage(message: impl Into<String>) -> Self {
        let message = message.into();
        EvidenceError::Storage {
            message: non_blank(message),
        }
    }

    /// Backend rejection, keeping the server's message only when it has content.
    pub fn submission(status: Option<u16>, message: Option<String>) -> Self {
        EvidenceError::Submission {
            status,
            message: message.and_then(non_blank),
        }
    }

    /// Get the error type name
    pub fn error_type(&self) -> &'static str {
        match self {
            EvidenceError::Decode(_) => "DecodeError",
            EvidenceError::Encode(_) => "EncodeError",
            EvidenceError::Storage { .. } => "StorageError",
            EvidenceError::Submission { .. } => "SubmissionError",
            EvidenceError::InvalidInput(_) => "InvalidInput",
        }
    }
}

fn non_blank(message: String) -> Option<String> {
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn evidence_error_static_metadata(
    err: &EvidenceError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        EvidenceError::Decode(_) => (
            "DECODE_ERROR",
            false,
            Some("Choose a different photo"),
            LogLevel::Debug,
        ),
        EvidenceError::Encode(_) => (
            "ENCODE_ERROR",
            false,
            Some("Select the photo again"),
            LogLevel::Error,
        ),
        EvidenceError::Storage { .. } => (
            "STORAGE_ERROR",
            true,
            Some("Confirm again to retry the upload"),
            LogLevel::Warn,
        ),
        EvidenceError::Submission { .. } => (
            "SUBMISSION_ERROR",
            true,
            Some("Review the form and confirm again"),
            LogLevel::Warn,
        ),
        EvidenceError::InvalidInput(_) => (
            "INVALID_INPUT",
            false,
            Some("Check the selected file and form values"),
            LogLevel::Debug,
        ),
    }
}

impl ErrorMetadata for EvidenceError {
    fn error_code(&self) -> &'static str {
        evidence_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        evidence_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        evidence_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        evidence_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            EvidenceError::Decode(_) => {
                "The selected file is not a readable image. Choose a different photo.".to_string()
            }
            EvidenceError::Encode(_) => {
                "Could not prepare the photo for upload. Select it again.".to_string()
            }
            EvidenceError::Storage { message } => message
                .clone()
                .unwrap_or_else(|| GENERIC_STORAGE_MESSAGE.to_string()),
            EvidenceError::Submission { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_SUBMISSION_MESSAGE.to_string()),
            EvidenceError::InvalidInput(ref msg) => msg.clone(),
        }
    }
}
