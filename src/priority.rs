//! Priority bands and the per-pixel priority buffer.
//!
//! A priority is an integer 0-15 standing in for depth: 0 is farthest from
//! the viewer, 15 always draws on top. Static scenery gets its priority from
//! the screen row it occupies (lower on screen is closer), or from an
//! explicit override. The rasterizer records the priority of every pixel it
//! paints in a [`PriorityBuffer`], and the compositor later tests sprite
//! pixels against it. That per-pixel test is the whole depth model: there is
//! no z-buffer and no 3D geometry.

use crate::framebuffer::buffer_offset;
use thiserror::Error;

/// Highest priority value.
pub const MAX_PRIORITY: u8 = 15;

/// Priority written for background-fill pixels.
pub const BACKGROUND_PRIORITY: u8 = 0;

/// Error type for band configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriorityError {
    #[error("priority bands must not be empty")]
    Empty,
    #[error("priority band {band} has value {value}, expected 0-15")]
    OutOfRange { band: usize, value: u8 },
    #[error("{count} priority bands exceed the screen height of {height}")]
    TooMany { count: usize, height: u32 },
}

/// Mapping from screen row to priority.
///
/// The screen height is split into `values.len()` equal bands, top to
/// bottom; band `i` carries priority `values[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriorityBands {
    values: Vec<u8>,
}

impl PriorityBands {
    /// Validate band values against a screen height.
    pub fn new(values: Vec<u8>, height: u32) -> Result<Self, PriorityError> {
        if values.is_empty() {
            return Err(PriorityError::Empty);
        }
        if values.len() > height as usize {
            return Err(PriorityError::TooMany {
                count: values.len(),
                height,
            });
        }
        if let Some((band, &value)) = values.iter().enumerate().find(|(_, v)| **v > MAX_PRIORITY) {
            return Err(PriorityError::OutOfRange { band, value });
        }
        Ok(Self { values })
    }

    /// Default bands: priorities 1 through 14, top to bottom.
    ///
    /// 0 stays free for the background fill, 15 for always-on-top content.
    pub fn standard() -> Self {
        Self {
            values: (1..=14).collect(),
        }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Priority of screen row `y` on a screen `height` rows tall.
    ///
    /// Rows above or below the screen clamp to the first or last band.
    ///
    /// ```
    /// use bandpaint::priority::PriorityBands;
    ///
    /// let bands = PriorityBands::new(vec![2, 6, 10, 14], 200).unwrap();
    /// assert_eq!(bands.priority_for_y(0, 200), 2);
    /// assert_eq!(bands.priority_for_y(49, 200), 2);
    /// assert_eq!(bands.priority_for_y(50, 200), 6);
    /// assert_eq!(bands.priority_for_y(199, 200), 14);
    /// ```
    pub fn priority_for_y(&self, y: i32, height: u32) -> u8 {
        let count = self.values.len();
        if height == 0 {
            return self.values[0];
        }
        let y = y.clamp(0, height as i32 - 1) as usize;
        let band = (y * count / height as usize).min(count - 1);
        self.values[band]
    }
}

impl Default for PriorityBands {
    fn default() -> Self {
        Self::standard()
    }
}

/// A byte-per-pixel priority map, same layout as a
/// [`Framebuffer`](crate::framebuffer::Framebuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityBuffer {
    width: u32,
    height: u32,
    values: Vec<u8>,
}

impl PriorityBuffer {
    pub fn new(width: u32, height: u32, fill: u8) -> Self {
        Self {
            width,
            height,
            values: vec![fill.min(MAX_PRIORITY); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw priority data, row-major.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Stored priority at `(x, y)`.
    ///
    /// Outside the buffer this reports [`MAX_PRIORITY`], so nothing is
    /// drawn there.
    pub fn priority_at(&self, x: i32, y: i32) -> u8 {
        buffer_offset(self.width, self.height, x, y)
            .map(|offset| self.values[offset])
            .unwrap_or(MAX_PRIORITY)
    }

    /// Write a priority; coordinates outside the buffer are ignored.
    pub fn set(&mut self, x: i32, y: i32, priority: u8) {
        if let Some(offset) = buffer_offset(self.width, self.height, x, y) {
            self.values[offset] = priority.min(MAX_PRIORITY);
        }
    }

    pub(crate) fn value_at_offset(&self, offset: usize) -> u8 {
        self.values[offset]
    }

    pub(crate) fn set_at_offset(&mut self, offset: usize, priority: u8) {
        self.values[offset] = priority.min(MAX_PRIORITY);
    }

    pub(crate) fn fill(&mut self, priority: u8) {
        self.values.fill(priority.min(MAX_PRIORITY));
    }
}
