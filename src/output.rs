//! Frame conversion and PNG output
//!
//! Frames are palette-index buffers; everything that leaves the engine as an
//! image goes through [`frame_to_image`] first.

use crate::framebuffer::Framebuffer;
use crate::palette::PaletteIndex;
use crate::priority::{PriorityBuffer, MAX_PRIORITY};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convert a frame to an opaque RGBA image using the fixed palette.
pub fn frame_to_image(frame: &Framebuffer) -> RgbaImage {
    let lut: Vec<Rgba<u8>> = PaletteIndex::all()
        .map(|c| {
            let [r, g, b] = c.rgb();
            Rgba([r, g, b, 255])
        })
        .collect();

    let mut image = RgbaImage::new(frame.width(), frame.height());
    for (pixel, &index) in image.pixels_mut().zip(frame.pixels()) {
        *pixel = lut[index as usize % lut.len()];
    }
    image
}

/// Visualize a priority buffer as grayscale, 0 black through 15 white.
pub fn priority_to_image(priority: &PriorityBuffer) -> RgbaImage {
    let step = 255 / MAX_PRIORITY;
    let mut image = RgbaImage::new(priority.width(), priority.height());
    for (pixel, &value) in image.pixels_mut().zip(priority.values()) {
        let v = value.min(MAX_PRIORITY) * step;
        *pixel = Rgba([v, v, v, 255]);
    }
    image
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    create_parent_dirs(path)?;
    image.save(path)?;
    Ok(())
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This keeps every screen pixel a crisp square block.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Default output path for a scene file.
///
/// `scenes/town.json` with suffix `None` and extension `png` gives
/// `scenes/town.png`; with suffix `Some("priority")`, `scenes/town_priority.png`.
pub fn default_output_path(input: &Path, suffix: Option<&str>, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let name = match suffix {
        Some(suffix) => format!("{}_{}.{}", stem, suffix, extension),
        None => format!("{}.{}", stem, extension),
    };
    input.with_file_name(name)
}

/// Path for the priority visualization next to a bitmap output.
pub fn priority_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output.with_file_name(format!("{}_priority.png", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frame_to_image_uses_palette() {
        let mut frame = Framebuffer::new(2, 1, PaletteIndex::BLACK);
        frame.set(1, 0, PaletteIndex::new(14).unwrap());
        let image = frame_to_image(&frame);
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([0xFF, 0xFF, 0x55, 255]));
    }

    #[test]
    fn test_priority_to_image_grayscale() {
        let mut priority = PriorityBuffer::new(2, 1, 0);
        priority.set(1, 0, 15);
        let image = priority_to_image(&priority);
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_scale_image() {
        let mut frame = Framebuffer::new(2, 2, PaletteIndex::BLACK);
        frame.set(1, 1, PaletteIndex::WHITE);
        let scaled = scale_image(frame_to_image(&frame), 3);
        assert_eq!(scaled.dimensions(), (6, 6));
        assert_eq!(*scaled.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*scaled.get_pixel(3, 3), Rgba([255, 255, 255, 255]));
        assert_eq!(*scaled.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_scale_image_factor_one_is_identity() {
        let image = frame_to_image(&Framebuffer::new(3, 2, PaletteIndex::WHITE));
        assert_eq!(scale_image(image.clone(), 1), image);
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/frame.png");
        let image = frame_to_image(&Framebuffer::new(4, 4, PaletteIndex::BLACK));
        save_png(&image, &path).unwrap();
        assert!(path.exists());
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("scenes/town.json"), None, "png"),
            PathBuf::from("scenes/town.png")
        );
        assert_eq!(
            default_output_path(Path::new("town.json5"), Some("priority"), "png"),
            PathBuf::from("town_priority.png")
        );
        assert_eq!(
            priority_output_path(Path::new("out/frame.png")),
            PathBuf::from("out/frame_priority.png")
        );
    }
}
