//! Data models for the evidence pipeline
//!
//! - `image`: the raw and normalized photo blobs and the uploaded reference
//! - `evidence`: evidence kinds, typed record payloads and submission targets

mod evidence;
mod image;

pub use evidence::*;
pub use image::*;
