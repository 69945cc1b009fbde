use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

/// JPEG encoder for normalized evidence photos
pub struct JpegCompressor;

impl JpegCompressor {
    /// Map a 0.0-1.0 quality factor onto the encoder's 1-100 scale
    pub fn jpeg_quality(factor: f32) -> u8 {
        (factor * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Encode to baseline JPEG. Alpha is dropped; transparent areas become black.
    pub fn compress(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();
        if width == 0 || height == 0 {
            return Err(anyhow!("Cannot encode an empty {}x{} surface", width, height));
        }

        let mut buffer = Vec::new();
        rgb_img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))?;

        if buffer.is_empty() {
            return Err(anyhow!("JPEG encoder produced no output"));
        }

        Ok(Bytes::from(buffer))
    }
}
