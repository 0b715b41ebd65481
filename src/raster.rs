//! Primitive rasterization into a bitmap and its priority buffer.
//!
//! The rasterizer writes palette indices and priorities in lockstep: every
//! pixel a primitive covers gets the primitive's color in the bitmap and
//! its priority (override or band) in the priority buffer. Primitives are
//! drawn in the order given, later ones overwriting earlier ones, which is
//! the only depth resolution static scenery needs.

use crate::dither::{self, Region};
use crate::framebuffer::Framebuffer;
use crate::palette::PaletteIndex;
use crate::primitive::{DrawCommand, Primitive};
use crate::priority::{PriorityBands, PriorityBuffer, BACKGROUND_PRIORITY};
use crate::shapes::{self, Bounds};
use thiserror::Error;

/// A primitive whose geometry cannot be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("degenerate {kind}: {reason}")]
pub struct DegenerateShape {
    pub kind: &'static str,
    pub reason: String,
}

/// Draws primitives into a borrowed bitmap and priority buffer.
///
/// # Examples
///
/// ```
/// use bandpaint::framebuffer::Framebuffer;
/// use bandpaint::palette::PaletteIndex;
/// use bandpaint::primitive::{DrawCommand, Primitive};
/// use bandpaint::priority::{PriorityBands, PriorityBuffer};
/// use bandpaint::raster::Rasterizer;
///
/// let mut bitmap = Framebuffer::new(8, 8, PaletteIndex::BLACK);
/// let mut priority = PriorityBuffer::new(8, 8, 0);
/// let bands = PriorityBands::standard();
///
/// let mut raster = Rasterizer::new(&mut bitmap, &mut priority, &bands);
/// let rect = Primitive::Rect { x: 0, y: 0, w: 2, h: 2, color: PaletteIndex::WHITE };
/// raster.draw(&DrawCommand::new(rect).with_priority(9)).unwrap();
///
/// assert_eq!(bitmap.get(1, 1), Some(PaletteIndex::WHITE));
/// assert_eq!(priority.priority_at(1, 1), 9);
/// ```
pub struct Rasterizer<'a> {
    bitmap: &'a mut Framebuffer,
    priority: &'a mut PriorityBuffer,
    bands: &'a PriorityBands,
}

impl<'a> Rasterizer<'a> {
    pub fn new(
        bitmap: &'a mut Framebuffer,
        priority: &'a mut PriorityBuffer,
        bands: &'a PriorityBands,
    ) -> Self {
        Self {
            bitmap,
            priority,
            bands,
        }
    }

    /// Fill the whole bitmap with `background` at the background priority.
    pub fn clear(&mut self, background: PaletteIndex) {
        self.bitmap.fill(background);
        self.priority.fill(BACKGROUND_PRIORITY);
    }

    /// Draw one primitive. Returns the number of in-bounds pixel writes.
    ///
    /// Off-screen pixels are clipped before iteration. A polygon with fewer than three
    /// points or a circle with a negative radius draws nothing and is
    /// reported as [`DegenerateShape`].
    pub fn draw(&mut self, command: &DrawCommand) -> Result<usize, DegenerateShape> {
        let height = self.bitmap.height();
        let clip = Bounds::of_size(self.bitmap.width(), height);
        let mut writer = PixelWriter {
            bitmap: &mut *self.bitmap,
            priority: &mut *self.priority,
            bands: self.bands,
            fixed: command.priority,
            height,
            written: 0,
        };

        match &command.primitive {
            Primitive::Rect { x, y, w, h, color } => {
                shapes::rect(clip, *x, *y, *w, *h, |px, py| writer.plot(px, py, *color));
            }
            Primitive::Polygon { points, color } => {
                if !shapes::polygon(clip, points, |px, py| writer.plot(px, py, *color)) {
                    return Err(DegenerateShape {
                        kind: "polygon",
                        reason: format!("{} points, need at least 3", points.len()),
                    });
                }
            }
            Primitive::Line { p0, p1, color } => {
                shapes::line(clip, *p0, *p1, |px, py| writer.plot(px, py, *color));
            }
            Primitive::Circle {
                center,
                radius,
                color,
                filled,
            } => {
                if *radius < 0 {
                    return Err(DegenerateShape {
                        kind: "circle",
                        reason: format!("negative radius {}", radius),
                    });
                }
                shapes::circle(clip, *center, *radius, *filled, |px, py| {
                    writer.plot(px, py, *color)
                });
            }
            Primitive::Sparkle { points, color } => {
                shapes::sparkle(clip, points, |px, py| writer.plot(px, py, *color));
            }
            Primitive::DitheredGradient {
                x,
                y,
                w,
                h,
                color1,
                color2,
            } => {
                let region = Region::new(*x, *y, *w, *h);
                dither::fill(region, clip, *color1, *color2, |px, py, c| {
                    writer.plot(px, py, c)
                });
            }
        }

        Ok(writer.written)
    }
}

/// Per-primitive write state shared by the shape callbacks.
struct PixelWriter<'b> {
    bitmap: &'b mut Framebuffer,
    priority: &'b mut PriorityBuffer,
    bands: &'b PriorityBands,
    fixed: Option<u8>,
    height: u32,
    written: usize,
}

impl PixelWriter<'_> {
    fn plot(&mut self, x: i32, y: i32, color: PaletteIndex) {
        let Some(offset) = self.bitmap.offset(x, y) else {
            return;
        };
        let priority = match self.fixed {
            Some(p) => p,
            None => self.bands.priority_for_y(y, self.height),
        };
        self.bitmap.set_at_offset(offset, color.get());
        self.priority.set_at_offset(offset, priority);
        self.written += 1;
    }
}
