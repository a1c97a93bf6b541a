//! Headless export.
//!
//! Runs a controller on a software canvas for a fixed number of frames and
//! writes the result as an image, composited over a white page the way the
//! viewer shows it. The format follows the file extension (PNG or JPEG).

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage, RgbaImage};
use log::info;

use crate::controller::CircularMotion;
use crate::error::ExportError;
use crate::frame::AnimationLoop;
use crate::options::PartialOptions;
use crate::raster::{PixelCanvas, Pixmap};

/// Frames rendered by the CLI when `--frames` is not given.
pub const DEFAULT_EXPORT_FRAMES: u32 = 120;

/// Render `frames` frames and return the canvas pixels.
pub fn render_frames(options: PartialOptions, frames: u32) -> Result<Pixmap, ExportError> {
    let canvas = PixelCanvas::new();
    let driver = AnimationLoop::new();
    let mut motion = CircularMotion::new(canvas.clone(), options, driver.clone())?;

    motion.start();
    for _ in 0..frames {
        driver.pump();
    }

    // Snapshot before the controller goes away; stopping would clear the canvas.
    let pixmap = canvas.snapshot();
    drop(motion);
    Ok(pixmap)
}

/// Composite straight-alpha pixels over white.
pub fn flatten(pixmap: &Pixmap) -> Result<RgbImage, ExportError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let rgba: RgbaImage = ImageBuffer::from_raw(width, height, pixmap.as_bytes().to_vec())
        .ok_or(ExportError::BufferSize {
            width,
            height,
            len: pixmap.as_bytes().len(),
        })?;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let over_white = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Rgb([over_white(r), over_white(g), over_white(b)])
    }))
}

/// Render `frames` frames and save the image to `path`.
pub fn export(options: PartialOptions, frames: u32, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let pixmap = render_frames(options, frames)?;
    let image = flatten(&pixmap)?;
    image.save(path)?;

    info!(
        "Exported {} frames at {}x{} to {}",
        frames,
        pixmap.width(),
        pixmap.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::ConfigurationError;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("circular-motion-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_zero_frames_is_blank_page() {
        let pixmap = render_frames(PartialOptions::new().with_size(32).with_offset_center(4.0), 0).unwrap();
        let image = flatten(&pixmap).unwrap();
        assert_eq!(image.dimensions(), (32, 32));
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_frames_leave_trails() {
        let options = PartialOptions::new()
            .with_size(64)
            .with_offset_center(8.0)
            .with_count_particles(12)
            .with_seed(3);
        let pixmap = render_frames(options, 30).unwrap();
        assert!(pixmap.painted_pixels() > 0);

        let image = flatten(&pixmap).unwrap();
        assert!(image.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    #[test]
    fn test_flatten_composites_over_white() {
        let mut pixmap = Pixmap::new(2, 1);
        pixmap.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgba(0, 0, 0, 0.5));
        let image = flatten(&pixmap).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [127, 127, 127]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_export_png_roundtrip() {
        let path = temp_path("export.png");
        export(PartialOptions::new().with_size(48).with_offset_center(6.0).with_seed(1), 10, &path).unwrap();

        let reopened = image::open(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!((reopened.width(), reopened.height()), (48, 48));
    }

    #[test]
    fn test_export_rejects_invalid_options() {
        let path = temp_path("invalid.png");
        let err = export(PartialOptions::new().with_count_particles(0), 1, &path).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Configuration(ConfigurationError::InvalidOptions { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_unknown_extension_is_image_error() {
        let path = temp_path("export.unknown");
        let err = export(PartialOptions::new().with_size(16).with_offset_center(2.0), 1, &path).unwrap_err();
        assert!(matches!(err, ExportError::Image(_)));
    }
}
