//! Fleet Evidence Library
//!
//! Drives the confirmation flow of a record that carries a photo: normalize the
//! picked image, show a preview, and on confirmation upload the photo, attach its
//! public URL to the record and submit the record to the backend.
//!
//! ```text
//! Idle -> Processing -> ReadyToConfirm -> Submitting -> Succeeded
//!              |                              |
//!              +-----------> Failed <---------+
//! ```

pub mod capture;
pub mod context;
pub mod preview;
pub mod traits;
pub mod uploader;

// Re-export commonly used types
pub use capture::{CaptureState, EvidenceCapture};
pub use context::CaptureContext;
pub use preview::{PreviewHandle, PreviewRegistry};
pub use traits::RecordSubmitter;
pub use uploader::EvidenceUploader;
