//! Fleet Storage Library
//!
//! This crate provides the object storage abstraction for evidence photos.
//! It includes the Storage trait and implementations for Supabase Storage, S3 and
//! the local filesystem.
//!
//! # Storage key format
//!
//! Every backend stores evidence under the same key layout:
//!
//! - `public/{category}-{epoch_millis}-{suffix}.jpg`
//!
//! where `category` is `abastecimentos`, `manutencoes` or `geral` and `suffix` is
//! seven random base36 characters. Keys must not contain `..` or a leading `/`.
//! Key generation is centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use fleet_core::StorageBackend;
pub use keys::{generate_evidence_key, new_evidence_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult};
