//! Thumbnail generation using the image crate.
//!
//! Thumbnails fit inside a square bounding box while preserving the aspect
//! ratio. Images that already fit are kept at their own size.

use std::path::Path;

use anyhow::Result;
use image::imageops::FilterType;
use image::{GenericImageView, RgbaImage};
use tracing::debug;

use crate::config::DEFAULT_THUMBNAIL_SIZE;
use crate::image_loader::open_image;

/// Renders scaled-down copies of pictures.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    max_edge: u32,
}

impl ThumbnailGenerator {
    pub fn new(max_edge: u32) -> Self {
        Self {
            max_edge: max_edge.max(1),
        }
    }

    pub fn max_edge(&self) -> u32 {
        self.max_edge
    }

    /// Decode `src` and scale it into the bounding box.
    pub fn render(&self, src: &Path) -> Result<RgbaImage> {
        let img = open_image(src)?;
        let (src_width, src_height) = img.dimensions();

        let (thumb_width, thumb_height) =
            Self::calculate_dimensions(src_width, src_height, self.max_edge);

        debug!(
            ?src,
            src_width, src_height, thumb_width, thumb_height, "Rendering thumbnail"
        );

        if (thumb_width, thumb_height) == (src_width, src_height) {
            return Ok(img.to_rgba8());
        }

        // CatmullRom provides good quality/speed balance for downscaling
        let thumbnail = img.resize_exact(thumb_width, thumb_height, FilterType::CatmullRom);
        Ok(thumbnail.to_rgba8())
    }

    /// Calculate dimensions that fit in `max_edge × max_edge` with the same
    /// aspect ratio. Never upscales; never returns a zero edge.
    pub fn calculate_dimensions(src_width: u32, src_height: u32, max_edge: u32) -> (u32, u32) {
        if src_width == 0 || src_height == 0 {
            return (max_edge.max(1), max_edge.max(1));
        }

        if src_width <= max_edge && src_height <= max_edge {
            return (src_width, src_height);
        }

        let scale = f64::min(
            max_edge as f64 / src_width as f64,
            max_edge as f64 / src_height as f64,
        );
        let width = (src_width as f64 * scale).round() as u32;
        let height = (src_height as f64 * scale).round() as u32;

        (width.clamp(1, max_edge), height.clamp(1, max_edge))
    }
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_THUMBNAIL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_calculate_dimensions_landscape() {
        let (w, h) = ThumbnailGenerator::calculate_dimensions(1920, 1080, 350);
        assert_eq!(w, 350);
        // 1080 * (350/1920) = 196.875
        assert_eq!(h, 197);
    }

    #[test]
    fn test_calculate_dimensions_portrait() {
        let (w, h) = ThumbnailGenerator::calculate_dimensions(1000, 2000, 350);
        assert_eq!((w, h), (175, 350));
    }

    #[test]
    fn test_calculate_dimensions_small_source() {
        // Source already fits - don't upscale
        let (w, h) = ThumbnailGenerator::calculate_dimensions(200, 100, 350);
        assert_eq!((w, h), (200, 100));
    }

    #[test]
    fn test_calculate_dimensions_extreme_panorama() {
        let (w, h) = ThumbnailGenerator::calculate_dimensions(100_000, 10, 350);
        assert_eq!(w, 350);
        assert_eq!(h, 1);
    }

    #[test]
    fn test_render_scales_into_box() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(800, 400).save(&path).unwrap();

        let thumb = ThumbnailGenerator::new(350).render(&path).unwrap();
        assert_eq!(thumb.dimensions(), (350, 175));
    }

    #[test]
    fn test_render_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(ThumbnailGenerator::default()
            .render(&dir.path().join("nope.jpg"))
            .is_err());
    }
}
