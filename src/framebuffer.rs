//! Fixed-resolution palette-index buffers

use crate::palette::PaletteIndex;

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 320;
/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 200;

/// A row-major bitmap holding one palette index per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// A buffer of the given size filled with `fill`.
    pub fn new(width: u32, height: u32, fill: PaletteIndex) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill.get(); width as usize * height as usize],
        }
    }

    /// A full-screen buffer.
    pub fn screen(fill: PaletteIndex) -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT, fill)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Row-major offset of `(x, y)`, `None` when outside the buffer.
    pub fn offset(&self, x: i32, y: i32) -> Option<usize> {
        buffer_offset(self.width, self.height, x, y)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<PaletteIndex> {
        self.offset(x, y)
            .and_then(|offset| PaletteIndex::new(self.pixels[offset]))
    }

    /// Write a pixel; coordinates outside the buffer are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: PaletteIndex) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset] = color.get();
        }
    }

    pub fn fill(&mut self, color: PaletteIndex) {
        self.pixels.fill(color.get());
    }

    /// Overwrite this buffer with `other`, adopting its size if it differs.
    pub fn copy_from(&mut self, other: &Framebuffer) {
        if self.width == other.width && self.height == other.height {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            self.width = other.width;
            self.height = other.height;
            self.pixels.clone_from(&other.pixels);
        }
    }

    pub(crate) fn set_at_offset(&mut self, offset: usize, color: u8) {
        self.pixels[offset] = color;
    }
}

/// Shared bounds check for the pixel and priority buffers.
pub(crate) fn buffer_offset(width: u32, height: u32, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
        return None;
    }
    Some(y as usize * width as usize + x as usize)
}
