//! Image normalizer
//!
//! Converts any decodable photo into an upright JPEG no larger than
//! `MAX_IMAGE_WIDTH` x `MAX_IMAGE_HEIGHT`, re-encoded at `JPEG_QUALITY`.

use crate::compression::JpegCompressor;
use crate::image::{ImageOrientation, ImageResize};
use crate::validator::{ImageValidator, ValidationError};
use fleet_core::constants::{
    DEFAULT_MAX_FILE_SIZE_MB, JPEG_QUALITY, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH,
};
use fleet_core::{EvidenceConfig, EvidenceError, EvidenceResult, NormalizedImage, RawImage};
use image::{GenericImageView, ImageReader};
use std::io::Cursor;

const DEFAULT_FILE_NAME: &str = "image.jpg";

/// Output name of a normalized image: the last extension replaced by `.jpg`.
///
/// `IMG_1.HEIC` becomes `IMG_1.jpg`, `photo` becomes `photo.jpg` and an empty name
/// becomes `image.jpg`.
pub fn normalized_file_name(file_name: &str) -> String {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }

    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{}.jpg", stem),
        Some(_) => DEFAULT_FILE_NAME.to_string(),
        None => format!("{}.jpg", file_name),
    }
}

/// Normalizes raw photos for upload
#[derive(Clone, Debug)]
pub struct ImageNormalizer {
    max_file_size: usize,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024)
    }
}

impl ImageNormalizer {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Normalizer honoring the configured raw photo size limit.
    pub fn from_config(config: &EvidenceConfig) -> Self {
        Self::new(config.max_file_size_bytes)
    }

    /// Normalize a raw photo.
    ///
    /// Decoding, resampling and encoding are CPU-bound and run on the blocking pool.
    pub async fn normalize(&self, raw: RawImage) -> EvidenceResult<NormalizedImage> {
        ImageValidator::new(self.max_file_size)
            .validate_file_size(raw.size())
            .map_err(|e| match e {
                ValidationError::EmptyFile => {
                    EvidenceError::InvalidInput("The selected file is empty".to_string())
                }
                ValidationError::FileTooLarge { .. } => EvidenceError::InvalidInput(e.to_string()),
            })?;

        tokio::task::spawn_blocking(move || Self::normalize_blocking(&raw))
            .await
            .map_err(|e| EvidenceError::Encode(format!("Normalization task failed: {}", e)))?
    }

    /// Synchronous normalization pipeline.
    pub fn normalize_blocking(raw: &RawImage) -> EvidenceResult<NormalizedImage> {
        let start = std::time::Instant::now();

        let reader = ImageReader::new(Cursor::new(raw.data.as_ref()))
            .with_guessed_format()
            .map_err(|e| EvidenceError::Decode(e.to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| EvidenceError::Decode(e.to_string()))?;

        let img = ImageOrientation::apply_exif_orientation(img, &raw.data);
        let (orig_width, orig_height) = img.dimensions();

        let (width, height) =
            ImageResize::fit_within(orig_width, orig_height, MAX_IMAGE_WIDTH, MAX_IMAGE_HEIGHT);
        if width == 0 || height == 0 {
            return Err(EvidenceError::Encode(format!(
                "Cannot draw a {}x{} surface",
                width, height
            )));
        }

        let img = ImageResize::resize_image(img, width, height);
        let data = JpegCompressor::compress(&img, JpegCompressor::jpeg_quality(JPEG_QUALITY))
            .map_err(|e| EvidenceError::Encode(e.to_string()))?;

        tracing::debug!(
            file_name = %raw.file_name,
            orig_width = orig_width,
            orig_height = orig_height,
            width = width,
            height = height,
            input_bytes = raw.size(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image normalized"
        );

        Ok(NormalizedImage {
            file_name: normalized_file_name(&raw.file_name),
            width,
            height,
            data,
        })
    }
}
