//! Fleet Image Processing Library
//!
//! This crate turns a photo picked by the user into the JPEG that is uploaded as
//! evidence: decode, EXIF orientation, bounded downscale and lossy re-encode.

pub mod compression;
pub mod image;
pub mod normalizer;
pub mod validator;

// Re-export commonly used types
pub use compression::JpegCompressor;
pub use image::{ImageOrientation, ImageResize};
pub use normalizer::{normalized_file_name, ImageNormalizer};
pub use validator::{ImageValidator, ValidationError};
