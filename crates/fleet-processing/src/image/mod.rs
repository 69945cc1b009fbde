//! Image processing module
//!
//! - Orientation correction from EXIF metadata (orientation)
//! - Bounded downscaling (resize)

pub mod orientation;
pub mod resize;

pub use orientation::ImageOrientation;
pub use resize::ImageResize;
