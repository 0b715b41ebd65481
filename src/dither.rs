//! Two-color dithering for pseudo-gradients
//!
//! The palette has no intermediate shades, so a gradient region alternates
//! two palette colors in a 2x2 checkerboard. The pattern is computed per
//! pixel from absolute screen coordinates: adjacent dithered regions line
//! up, and nothing is cached.

use crate::palette::PaletteIndex;
use crate::shapes::Bounds;

/// An axis-aligned pixel region `[x, x+w) x [y, y+h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// The part of this region inside `bounds`, possibly empty.
    pub fn clipped(&self, bounds: Bounds) -> Region {
        if self.is_empty() {
            return Region::new(0, 0, 0, 0);
        }
        let x0 = i64::from(self.x).max(i64::from(bounds.min_x));
        let y0 = i64::from(self.y).max(i64::from(bounds.min_y));
        let x1 = (i64::from(self.x) + i64::from(self.w)).min(i64::from(bounds.max_x) + 1);
        let y1 = (i64::from(self.y) + i64::from(self.h)).min(i64::from(bounds.max_y) + 1);
        if x1 <= x0 || y1 <= y0 {
            return Region::new(0, 0, 0, 0);
        }
        let narrow = |n: i64| i32::try_from(n).unwrap_or(i32::MAX);
        Region::new(narrow(x0), narrow(y0), narrow(x1 - x0), narrow(y1 - y0))
    }
}

/// Color of the checkerboard at `(x, y)`.
///
/// `color1` where `(x + y)` is even, `color2` otherwise.
///
/// ```
/// use bandpaint::dither::color_at;
/// use bandpaint::palette::PaletteIndex;
///
/// let (a, b) = (PaletteIndex::BLACK, PaletteIndex::WHITE);
/// assert_eq!(color_at(0, 0, a, b), a);
/// assert_eq!(color_at(1, 0, a, b), b);
/// assert_eq!(color_at(1, 1, a, b), a);
/// ```
pub fn color_at(x: i32, y: i32, color1: PaletteIndex, color2: PaletteIndex) -> PaletteIndex {
    // rem_euclid keeps the pattern continuous across negative coordinates
    if (x + y).rem_euclid(2) == 0 {
        color1
    } else {
        color2
    }
}

/// Fill a region with the checkerboard, reporting each pixel to `plot`.
///
/// Only the part of `region` inside `clip` is visited, rows top to bottom,
/// left to right.
pub fn fill<F>(
    region: Region,
    clip: Bounds,
    color1: PaletteIndex,
    color2: PaletteIndex,
    mut plot: F,
) where
    F: FnMut(i32, i32, PaletteIndex),
{
    let visible = region.clipped(clip);
    if visible.is_empty() {
        return;
    }

    let x_end = i64::from(visible.x) + i64::from(visible.w);
    let y_end = i64::from(visible.y) + i64::from(visible.h);
    for y in i64::from(visible.y)..y_end {
        for x in i64::from(visible.x)..x_end {
            let (x, y) = (x as i32, y as i32);
            plot(x, y, color_at(x, y, color1, color2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: Bounds = Bounds::UNBOUNDED;

    fn idx(i: u8) -> PaletteIndex {
        PaletteIndex::new(i).unwrap()
    }

    #[test]
    fn test_checker_4x4_exact() {
        let (a, b) = (idx(1), idx(14));
        let mut pixels = Vec::new();
        fill(Region::new(0, 0, 4, 4), ALL, a, b, |x, y, c| pixels.push((x, y, c)));

        assert_eq!(pixels.len(), 16);
        for (x, y, c) in pixels {
            let expected = if (x + y) % 2 == 0 { a } else { b };
            assert_eq!(c, expected, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_checker_uses_absolute_coordinates() {
        // A region starting at an odd x begins with color2
        let (a, b) = (idx(2), idx(3));
        let mut first = None;
        fill(Region::new(1, 0, 2, 1), ALL, a, b, |_, _, c| {
            first.get_or_insert(c);
        });
        assert_eq!(first, Some(b));
    }

    #[test]
    fn test_checker_negative_coordinates() {
        let (a, b) = (idx(4), idx(5));
        assert_eq!(color_at(-1, 0, a, b), b);
        assert_eq!(color_at(-1, -1, a, b), a);
    }

    #[test]
    fn test_empty_region_plots_nothing() {
        let mut count = 0;
        fill(Region::new(0, 0, 0, 5), ALL, idx(0), idx(1), |_, _, _| count += 1);
        fill(Region::new(0, 0, 5, -1), ALL, idx(0), idx(1), |_, _, _| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_fill_is_deterministic() {
        let collect = || {
            let mut out = Vec::new();
            fill(Region::new(3, 7, 5, 3), ALL, idx(8), idx(7), |x, y, c| out.push((x, y, c)));
            out
        };
        assert_eq!(collect(), collect());
    }

    #[test]
    fn test_fill_visits_only_clipped_part() {
        let mut count = 0;
        let screen = Bounds::of_size(320, 200);
        fill(
            Region::new(0, 0, 2_000_000_000, 2_000_000_000),
            screen,
            idx(1),
            idx(2),
            |_, _, _| count += 1,
        );
        assert_eq!(count, 320 * 200);
    }

    #[test]
    fn test_clipped_region_outside_bounds_is_empty() {
        let screen = Bounds::of_size(320, 200);
        assert!(Region::new(400, 0, 10, 10).clipped(screen).is_empty());
        assert_eq!(
            Region::new(-5, 195, 10, 10).clipped(screen),
            Region::new(0, 195, 5, 5)
        );
    }
}
