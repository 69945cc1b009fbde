//! Fleet Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! every crate of the evidence capture pipeline: the image normalizer, the storage
//! backends, the backend API client and the confirmation orchestrator.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::EvidenceConfig;
pub use error::{ErrorMetadata, EvidenceError, EvidenceResult, LogLevel};
pub use models::{
    EvidenceKind, EvidencePayload, MaintenanceOrderRecord, NormalizedImage, RawImage,
    RefuelingRecord, SubmitMethod, SubmitTarget, TripEndRecord, TripStartRecord,
    UploadedEvidenceRef,
};
pub use storage_types::StorageBackend;
