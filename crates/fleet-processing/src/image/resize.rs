use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Dimensions of an image scaled down to fit inside `max_width` x `max_height`.
    ///
    /// Uses a single uniform factor `min(1, max_width / w, max_height / h)`, so the
    /// aspect ratio is kept and small images are never upscaled. Rounded values are
    /// clamped to `[1, max]`.
    pub fn fit_within(
        orig_width: u32,
        orig_height: u32,
        max_width: u32,
        max_height: u32,
    ) -> (u32, u32) {
        if orig_width == 0 || orig_height == 0 {
            return (orig_width, orig_height);
        }

        let scale = (max_width as f64 / orig_width as f64)
            .min(max_height as f64 / orig_height as f64)
            .min(1.0);

        if scale >= 1.0 {
            return (orig_width, orig_height);
        }

        let width = ((orig_width as f64 * scale).round() as u32).clamp(1, max_width);
        let height = ((orig_height as f64 * scale).round() as u32).clamp(1, max_height);
        (width, height)
    }

    /// Select the best filter for resizing based on scale factor
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions; a no-op when they already match
    pub fn resize_image(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img;
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(ImageResize::fit_within(4000, 3000, 1200, 1600), (1200, 900));
        assert_eq!(ImageResize::fit_within(1920, 1080, 1200, 1600), (1200, 675));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(ImageResize::fit_within(3000, 4000, 1200, 1600), (1200, 1600));
        assert_eq!(ImageResize::fit_within(1080, 1920, 1200, 1600), (900, 1600));
    }

    #[test]
    fn test_fit_within_square_keeps_width_bound() {
        assert_eq!(ImageResize::fit_within(2000, 2000, 1200, 1600), (1200, 1200));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(ImageResize::fit_within(800, 600, 1200, 1600), (800, 600));
        assert_eq!(ImageResize::fit_within(1200, 1600, 1200, 1600), (1200, 1600));
        assert_eq!(ImageResize::fit_within(1, 1, 1200, 1600), (1, 1));
    }

    #[test]
    fn test_fit_within_extreme_aspect_ratio() {
        assert_eq!(ImageResize::fit_within(10000, 10, 1200, 1600), (1200, 1));
        assert_eq!(ImageResize::fit_within(5, 20000, 1200, 1600), (1, 1600));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(
            ImageResize::select_filter(4000, 3000, 1200, 900),
            FilterType::Triangle
        );
        assert_eq!(
            ImageResize::select_filter(1800, 1200, 1100, 733),
            FilterType::CatmullRom
        );
        assert_eq!(
            ImageResize::select_filter(1300, 1000, 1200, 923),
            FilterType::Lanczos3
        );
    }

    #[test]
    fn test_resize_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 300, Rgb([10, 20, 30])));
        let resized = ImageResize::resize_image(img, 120, 90);
        assert_eq!(resized.dimensions(), (120, 90));
    }
}
