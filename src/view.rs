//! Sprite animation data: cels, loops and views.
//!
//! A [`View`] is immutable once loaded and shared between every sprite
//! instance that shows it. All validation happens at load time so the
//! animator and compositor never see a malformed cel.

use crate::palette::{PaletteIndex, PALETTE_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for view loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("invalid view descriptor: {0}")]
    Parse(String),
    #[error("view '{view}' has no loops")]
    NoLoops { view: String },
    #[error("loop '{name}' of view '{view}' has no cels")]
    EmptyLoop { view: String, name: String },
    #[error("cel is {width}x{height}, which has no pixels")]
    ZeroSize { width: u32, height: u32 },
    #[error("cel is {width}x{height} but has {actual} pixels")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
    #[error("cel pixel {value} is not a palette index (0-15)")]
    InvalidPixel { value: u8 },
    #[error("cel row {row} is {actual} pixels wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cel row {row} has invalid character '{ch}', expected a hex digit or '.'")]
    InvalidDigit { row: usize, ch: char },
}

/// One frame of sprite animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cel {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    opaque: Vec<bool>,
    duration_ms: u32,
}

impl Cel {
    /// Build a cel from row-major palette indices.
    ///
    /// Pixels equal to `transparent` are left out of the opacity mask.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        transparent: Option<u8>,
        duration_ms: u32,
    ) -> Result<Self, ViewError> {
        if width == 0 || height == 0 {
            return Err(ViewError::ZeroSize { width, height });
        }
        if pixels.len() != width as usize * height as usize {
            return Err(ViewError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        let opaque: Vec<bool> = pixels.iter().map(|&p| Some(p) != transparent).collect();
        if let Some(&value) = pixels
            .iter()
            .zip(&opaque)
            .find(|(p, o)| **o && **p as usize >= PALETTE_SIZE)
            .map(|(p, _)| p)
        {
            return Err(ViewError::InvalidPixel { value });
        }
        Ok(Self {
            width,
            height,
            pixels,
            opaque,
            duration_ms,
        })
    }

    /// Build a cel from rows of hex digits, `.` marking transparency.
    ///
    /// ```
    /// use bandpaint::view::Cel;
    ///
    /// let cel = Cel::from_rows(&[".F.", "FFF"], 100).unwrap();
    /// assert_eq!((cel.width(), cel.height()), (3, 2));
    /// assert!(cel.pixel(0, 0).is_none());
    /// assert_eq!(cel.pixel(1, 0).map(|c| c.get()), Some(15));
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S], duration_ms: u32) -> Result<Self, ViewError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(ViewError::ZeroSize {
                width: width as u32,
                height: height as u32,
            });
        }

        let mut pixels = Vec::with_capacity(width * height);
        let mut opaque = Vec::with_capacity(width * height);
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width {
                return Err(ViewError::RaggedRow {
                    row: row_index,
                    expected: width,
                    actual,
                });
            }
            for ch in row.chars() {
                if ch == '.' {
                    pixels.push(0);
                    opaque.push(false);
                } else {
                    let digit = ch
                        .to_digit(16)
                        .ok_or(ViewError::InvalidDigit { row: row_index, ch })?;
                    pixels.push(digit as u8);
                    opaque.push(true);
                }
            }
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            pixels,
            opaque,
            duration_ms,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Color at `(x, y)` within the cel, `None` if transparent or outside.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PaletteIndex> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) as usize;
        if self.opaque[i] {
            PaletteIndex::new(self.pixels[i])
        } else {
            None
        }
    }

    /// Row `y` as (palette index, opaque) pairs.
    pub(crate) fn row(&self, y: u32) -> impl Iterator<Item = (u8, bool)> + '_ {
        let start = (y * self.width) as usize;
        let end = start + self.width as usize;
        self.pixels[start..end]
            .iter()
            .copied()
            .zip(self.opaque[start..end].iter().copied())
    }
}

/// A named sequence of cels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub name: String,
    pub repeat: bool,
    pub cels: Vec<Cel>,
}

/// A named set of loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    name: String,
    loops: Vec<Loop>,
}

impl View {
    /// Assemble a view. Needs at least one loop, and no loop may be empty.
    pub fn new(name: impl Into<String>, loops: Vec<Loop>) -> Result<Self, ViewError> {
        let name = name.into();
        if loops.is_empty() {
            return Err(ViewError::NoLoops { view: name });
        }
        if let Some(empty) = loops.iter().find(|l| l.cels.is_empty()) {
            return Err(ViewError::EmptyLoop {
                view: name,
                name: empty.name.clone(),
            });
        }
        Ok(Self { name, loops })
    }

    /// Parse a single view descriptor (JSON or JSON5).
    pub fn from_json(text: &str) -> Result<Self, ViewError> {
        parse_text::<ViewDesc>(text)?.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    pub fn loop_index(&self, name: &str) -> Option<usize> {
        self.loops.iter().position(|l| l.name == name)
    }

    pub fn loop_names(&self) -> Vec<&str> {
        self.loops.iter().map(|l| l.name.as_str()).collect()
    }
}

/// Parse a list of view descriptors (JSON or JSON5 array).
pub fn load_views(text: &str) -> Result<Vec<View>, ViewError> {
    parse_text::<Vec<ViewDesc>>(text)?
        .into_iter()
        .map(ViewDesc::build)
        .collect()
}

fn parse_text<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ViewError> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => json5::from_str(text).map_err(|_| ViewError::Parse(json_err.to_string())),
    }
}

/// View as written in a descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDesc {
    pub name: String,
    pub loops: Vec<LoopDesc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopDesc {
    pub name: String,
    #[serde(default = "default_repeat")]
    pub repeat: bool,
    pub cels: Vec<CelDesc>,
}

fn default_repeat() -> bool {
    true
}

/// Cel as written: explicit pixel array, or hex rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CelDesc {
    Pixels {
        duration_ms: u32,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transparent: Option<u8>,
    },
    Rows {
        duration_ms: u32,
        rows: Vec<String>,
    },
}

impl CelDesc {
    pub fn build(&self) -> Result<Cel, ViewError> {
        match self {
            CelDesc::Pixels {
                duration_ms,
                width,
                height,
                pixels,
                transparent,
            } => Cel::new(*width, *height, pixels.clone(), *transparent, *duration_ms),
            CelDesc::Rows { duration_ms, rows } => Cel::from_rows(rows, *duration_ms),
        }
    }
}

impl ViewDesc {
    pub fn build(self) -> Result<View, ViewError> {
        let loops = self
            .loops
            .into_iter()
            .map(|l| {
                let cels = l
                    .cels
                    .iter()
                    .map(CelDesc::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Loop {
                    name: l.name,
                    repeat: l.repeat,
                    cels,
                })
            })
            .collect::<Result<Vec<_>, ViewError>>()?;
        View::new(self.name, loops)
    }
}
