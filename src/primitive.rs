//! Scene primitives: descriptor form and resolved form.
//!
//! [`PrimitiveDesc`] mirrors the JSON a scene author writes. Resolving it
//! checks every color against the palette and the geometry for obvious
//! malformation, producing a [`DrawCommand`] the rasterizer can execute
//! without further checks.

use crate::palette::{resolve, PaletteColor, PaletteError, PaletteIndex};
use crate::priority::MAX_PRIORITY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer pixel coordinate.
pub type Point = (i32, i32);

/// Largest magnitude accepted for any coordinate, size or radius.
pub const MAX_EXTENT: i32 = i16::MAX as i32;

/// A resolved drawing primitive. Colors are palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: PaletteIndex,
    },
    Polygon {
        points: Vec<Point>,
        color: PaletteIndex,
    },
    Line {
        p0: Point,
        p1: Point,
        color: PaletteIndex,
    },
    Circle {
        center: Point,
        radius: i32,
        color: PaletteIndex,
        filled: bool,
    },
    Sparkle {
        points: Vec<Point>,
        color: PaletteIndex,
    },
    DitheredGradient {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color1: PaletteIndex,
        color2: PaletteIndex,
    },
}

impl Primitive {
    /// Descriptor type name of this primitive.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Rect { .. } => "rect",
            Primitive::Polygon { .. } => "polygon",
            Primitive::Line { .. } => "line",
            Primitive::Circle { .. } => "circle",
            Primitive::Sparkle { .. } => "sparkle",
            Primitive::DitheredGradient { .. } => "dithered_gradient",
        }
    }
}

/// A primitive plus its optional fixed priority.
///
/// Without an override each pixel takes the priority of the band its row
/// falls in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub priority: Option<u8>,
}

impl DrawCommand {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A primitive as written in a scene descriptor.
///
/// ```
/// use bandpaint::primitive::PrimitiveDesc;
///
/// let desc: PrimitiveDesc = serde_json::from_str(
///     r#"{"type": "rect", "dims": [0, 0, 10, 10], "color": "blue", "priority": 4}"#,
/// ).unwrap();
/// let cmd = desc.resolve().unwrap();
/// assert_eq!(cmd.priority, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimitiveDesc {
    Rect {
        dims: [i32; 4],
        color: PaletteColor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u8>,
    },
    Polygon {
        points: Vec<[i32; 2]>,
        color: PaletteColor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u8>,
    },
    Line {
        points: Vec<[i32; 2]>,
        color: PaletteColor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u8>,
    },
    Circle {
        center: [i32; 2],
        radius: i32,
        color: PaletteColor,
        #[serde(default = "default_filled")]
        filled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u8>,
    },
    Sparkle {
        points: Vec<[i32; 2]>,
        color: PaletteColor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u8>,
    },
    DitheredGradient {
        dims: [i32; 4],
        color1: PaletteColor,
        color2: PaletteColor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u8>,
    },
}

fn default_filled() -> bool {
    true
}

/// Why a primitive could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Color(#[from] PaletteError),
    #[error("malformed {kind}: {reason}")]
    Malformed { kind: &'static str, reason: String },
}

impl PrimitiveDesc {
    /// Descriptor type name.
    pub fn kind(&self) -> &'static str {
        match self {
            PrimitiveDesc::Rect { .. } => "rect",
            PrimitiveDesc::Polygon { .. } => "polygon",
            PrimitiveDesc::Line { .. } => "line",
            PrimitiveDesc::Circle { .. } => "circle",
            PrimitiveDesc::Sparkle { .. } => "sparkle",
            PrimitiveDesc::DitheredGradient { .. } => "dithered_gradient",
        }
    }

    pub fn priority(&self) -> Option<u8> {
        match self {
            PrimitiveDesc::Rect { priority, .. }
            | PrimitiveDesc::Polygon { priority, .. }
            | PrimitiveDesc::Line { priority, .. }
            | PrimitiveDesc::Circle { priority, .. }
            | PrimitiveDesc::Sparkle { priority, .. }
            | PrimitiveDesc::DitheredGradient { priority, .. } => *priority,
        }
    }

    /// Every coordinate, size and radius in the descriptor.
    fn extents(&self) -> Box<dyn Iterator<Item = i32> + '_> {
        match self {
            PrimitiveDesc::Rect { dims, .. } | PrimitiveDesc::DitheredGradient { dims, .. } => {
                Box::new(dims.iter().copied())
            }
            PrimitiveDesc::Polygon { points, .. }
            | PrimitiveDesc::Line { points, .. }
            | PrimitiveDesc::Sparkle { points, .. } => Box::new(points.iter().flatten().copied()),
            PrimitiveDesc::Circle { center, radius, .. } => {
                Box::new(center.iter().copied().chain(std::iter::once(*radius)))
            }
        }
    }

    /// Validate colors and geometry.
    ///
    /// Geometry is checked before colors, so a primitive that is both
    /// malformed and miscolored reports as malformed.
    pub fn resolve(&self) -> Result<DrawCommand, ResolveError> {
        let kind = self.kind();
        let malformed = |reason: String| ResolveError::Malformed { kind, reason };

        if let Some(p) = self.priority() {
            if p > MAX_PRIORITY {
                return Err(malformed(format!("priority {} is outside 0-15", p)));
            }
        }

        if let Some(value) = self
            .extents()
            .find(|v| v.unsigned_abs() > MAX_EXTENT.unsigned_abs()) {
            return Err(malformed(format!(
                "geometry value {} is outside +/-{}",
                value, MAX_EXTENT
            )));
        }

        let primitive = match self {
            PrimitiveDesc::Rect { dims, color, .. } => {
                let [x, y, w, h] = *dims;
                Primitive::Rect {
                    x,
                    y,
                    w,
                    h,
                    color: resolve(color)?,
                }
            }
            PrimitiveDesc::Polygon { points, color, .. } => {
                if points.len() < 3 {
                    return Err(malformed(format!(
                        "polygon needs at least 3 points, got {}",
                        points.len()
                    )));
                }
                Primitive::Polygon {
                    points: to_points(points),
                    color: resolve(color)?,
                }
            }
            PrimitiveDesc::Line { points, color, .. } => match points.as_slice() {
                [[x0, y0], [x1, y1]] => Primitive::Line {
                    p0: (*x0, *y0),
                    p1: (*x1, *y1),
                    color: resolve(color)?,
                },
                _ => {
                    return Err(malformed(format!(
                        "line needs exactly 2 points, got {}",
                        points.len()
                    )))
                }
            },
            PrimitiveDesc::Circle {
                center,
                radius,
                color,
                filled,
                ..
            } => {
                if *radius < 0 {
                    return Err(malformed(format!("negative radius {}", radius)));
                }
                Primitive::Circle {
                    center: (center[0], center[1]),
                    radius: *radius,
                    color: resolve(color)?,
                    filled: *filled,
                }
            }
            PrimitiveDesc::Sparkle { points, color, .. } => {
                if points.is_empty() {
                    return Err(malformed("sparkle has no points".to_string()));
                }
                Primitive::Sparkle {
                    points: to_points(points),
                    color: resolve(color)?,
                }
            }
            PrimitiveDesc::DitheredGradient {
                dims,
                color1,
                color2,
                ..
            } => {
                let [x, y, w, h] = *dims;
                Primitive::DitheredGradient {
                    x,
                    y,
                    w,
                    h,
                    color1: resolve(color1)?,
                    color2: resolve(color2)?,
                }
            }
        };

        Ok(DrawCommand {
            primitive,
            priority: self.priority(),
        })
    }
}

fn to_points(points: &[[i32; 2]]) -> Vec<Point> {
    points.iter().map(|&[x, y]| (x, y)).collect()
}
