//! Horizontal image stitching: the compositing collaborator.
//!
//! Stitching sessions delegate here to merge the current pair into one
//! side-by-side image. The session only talks to the [`Compositor`] trait;
//! [`ImageCompositor`] is the default adapter built on the `image` crate.

use std::path::{Path, PathBuf};

use image::{GenericImageView, Rgba, RgbaImage};

use crate::error::CompositeError;
use crate::source::ImageRef;

/// Compositing collaborator for stitched pairs.
pub trait Compositor {
    /// Merge left and right side-by-side and write the result under
    /// `output_name` in `output_dir`. Fails with
    /// [`CompositeError::DimensionMismatch`] when the source heights differ.
    fn composite(
        &mut self,
        left: &ImageRef,
        right: &ImageRef,
        output_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, CompositeError>;
}

/// Default compositor decoding with the `image` crate.
///
/// Sources are flattened onto a white canvas and written as PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCompositor;

impl ImageCompositor {
    /// Create a new compositor.
    pub fn new() -> Self {
        Self
    }
}

impl Compositor for ImageCompositor {
    fn composite(
        &mut self,
        left: &ImageRef,
        right: &ImageRef,
        output_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, CompositeError> {
        for source in [left, right] {
            if !source.path().exists() {
                return Err(CompositeError::NotFound {
                    path: source.path().to_path_buf(),
                });
            }
        }

        let left_img = image::open(left.path())?;
        let right_img = image::open(right.path())?;

        let (left_w, left_h) = left_img.dimensions();
        let (right_w, right_h) = right_img.dimensions();
        if left_h != right_h {
            return Err(CompositeError::DimensionMismatch {
                left: left_h,
                right: right_h,
            });
        }

        let mut canvas = RgbaImage::from_pixel(left_w + right_w, left_h, Rgba([255, 255, 255, 255]));
        image::imageops::overlay(&mut canvas, &left_img.to_rgba8(), 0, 0);
        image::imageops::overlay(&mut canvas, &right_img.to_rgba8(), i64::from(left_w), 0);

        if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
            std::fs::create_dir_all(output_dir)?;
        }
        let path = output_dir.join(output_name);
        canvas.save(&path)?;
        log::debug!(
            "stitched {} + {} -> {:?} ({}x{})",
            left.name(),
            right.name(),
            path,
            left_w + right_w,
            left_h
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_output(test: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("pairlab-composite-{}-{}", test, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_image(dir: &Path, name: &str, width: u32, height: u32, pixel: [u8; 4]) -> ImageRef {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba(pixel))
            .save(&path)
            .expect("Failed to write test image");
        ImageRef::from_path(path)
    }

    #[test]
    fn test_composite_widths_add_up() {
        let dir = temp_output("ok");
        let left = write_image(&dir, "left.png", 2, 2, [255, 0, 0, 255]);
        let right = write_image(&dir, "right.png", 3, 2, [0, 0, 255, 255]);

        let mut compositor = ImageCompositor::new();
        let out = compositor
            .composite(&left, &right, "1.png", &dir)
            .expect("Failed to composite");

        let merged = image::open(&out).unwrap();
        assert_eq!(merged.dimensions(), (5, 2));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_composite_rejects_height_mismatch() {
        let dir = temp_output("mismatch");
        let left = write_image(&dir, "left.png", 2, 2, [255, 0, 0, 255]);
        let right = write_image(&dir, "right.png", 2, 4, [0, 0, 255, 255]);

        let mut compositor = ImageCompositor::new();
        assert!(matches!(
            compositor.composite(&left, &right, "1.png", &dir),
            Err(CompositeError::DimensionMismatch { left: 2, right: 4 })
        ));
        assert!(!dir.join("1.png").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_composite_missing_source() {
        let dir = temp_output("gone");
        let left = write_image(&dir, "left.png", 2, 2, [255, 0, 0, 255]);
        let right = ImageRef::new("ghost.png", dir.join("ghost.png"));

        let mut compositor = ImageCompositor::new();
        assert!(matches!(
            compositor.composite(&left, &right, "1.png", &dir),
            Err(CompositeError::NotFound { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
