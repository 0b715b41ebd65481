//! Shape rasterization primitives for pixel-exact rendering.
//!
//! Each function walks the integer pixels covered by a shape and reports
//! them to a `plot` callback, clipped to a [`Bounds`] window. Fill loops
//! iterate only the visible rows and columns; outline walks still step
//! along the whole shape, so callers bound coordinates before drawing.
//! Pixels may be reported more than once; every consumer writes
//! idempotently.

/// Inclusive pixel window a shape is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Every representable pixel.
    pub const UNBOUNDED: Bounds = Bounds {
        min_x: i32::MIN,
        min_y: i32::MIN,
        max_x: i32::MAX,
        max_y: i32::MAX,
    };

    /// The pixels of a `width` x `height` buffer.
    pub fn of_size(width: u32, height: u32) -> Self {
        let clamp = |n: u32| i32::try_from(n).unwrap_or(i32::MAX).saturating_sub(1);
        Self {
            min_x: 0,
            min_y: 0,
            max_x: clamp(width),
            max_y: clamp(height),
        }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= i64::from(self.min_x)
            && x <= i64::from(self.max_x)
            && y >= i64::from(self.min_y)
            && y <= i64::from(self.max_y)
    }
}

/// Bresenham's line algorithm, inclusive of both endpoints.
///
/// Steps are computed in `i64`, so any pair of `i32` endpoints is safe;
/// only pixels inside `clip` are reported.
///
/// # Examples
///
/// ```
/// use bandpaint::shapes::{line, Bounds};
///
/// let mut pixels = Vec::new();
/// line(Bounds::UNBOUNDED, (0, 0), (3, 3), |x, y| pixels.push((x, y)));
/// assert_eq!(pixels, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
/// ```
pub fn line<F: FnMut(i32, i32)>(clip: Bounds, p0: (i32, i32), p1: (i32, i32), mut plot: F) {
    let (mut x0, mut y0) = (i64::from(p0.0), i64::from(p0.1));
    let (x1, y1) = (i64::from(p1.0), i64::from(p1.1));

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot_clipped(&clip, x0, y0, &mut plot);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Filled rectangle covering `[x, x+w) x [y, y+h)`, clipped to `clip`.
///
/// Non-positive sizes cover nothing.
pub fn rect<F: FnMut(i32, i32)>(clip: Bounds, x: i32, y: i32, w: i32, h: i32, mut plot: F) {
    if w <= 0 || h <= 0 {
        return;
    }

    let (x, y) = (i64::from(x), i64::from(y));
    let x_end = (x + i64::from(w) - 1).min(i64::from(clip.max_x));
    let y_end = (y + i64::from(h) - 1).min(i64::from(clip.max_y));
    let x_start = x.max(i64::from(clip.min_x));
    let y_start = y.max(i64::from(clip.min_y));

    for py in y_start..=y_end {
        for px in x_start..=x_end {
            plot(px as i32, py as i32);
        }
    }
}

/// Circle by the midpoint algorithm.
///
/// `filled` covers every pixel within the radius with horizontal spans;
/// otherwise only the 8-way symmetric outline is reported. A radius of zero
/// is the single center pixel; negative radii cover nothing.
///
/// # Examples
///
/// ```
/// use bandpaint::shapes::{circle, Bounds};
///
/// let mut count = 0;
/// circle(Bounds::UNBOUNDED, (5, 5), 0, true, |_, _| count += 1);
/// assert_eq!(count, 1);
/// ```
pub fn circle<F: FnMut(i32, i32)>(
    clip: Bounds,
    center: (i32, i32),
    radius: i32,
    filled: bool,
    mut plot: F,
) {
    if radius < 0 {
        return;
    }

    let (cx, cy) = (i64::from(center.0), i64::from(center.1));
    let mut x = i64::from(radius);
    let mut y = 0i64;
    let mut err = 1 - x;

    while x >= y {
        if filled {
            hspan(&clip, cx - x, cx + x, cy + y, &mut plot);
            hspan(&clip, cx - x, cx + x, cy - y, &mut plot);
            hspan(&clip, cx - y, cx + y, cy + x, &mut plot);
            hspan(&clip, cx - y, cx + y, cy - x, &mut plot);
        } else {
            for (px, py) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                plot_clipped(&clip, cx + px, cy + py, &mut plot);
            }
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Five-pixel plus shape (center and its four neighbours) at every point.
pub fn sparkle<F: FnMut(i32, i32)>(clip: Bounds, centers: &[(i32, i32)], mut plot: F) {
    for &(x, y) in centers {
        let (x, y) = (i64::from(x), i64::from(y));
        for (px, py) in [(x, y), (x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
            plot_clipped(&clip, px, py, &mut plot);
        }
    }
}

/// Filled polygon by scanline, even-odd rule.
///
/// Edges are intersected half-open (`[y_min, y_max)`) so a vertex shared by
/// two edges counts once. Only scanlines inside `clip` are visited. After
/// the interior spans, the closed outline is traced with [`line`] so
/// boundary pixels, including the bottom edge, are always covered.
///
/// Returns `false` without plotting when fewer than 3 vertices are given.
///
/// # Examples
///
/// ```
/// use bandpaint::shapes::{polygon, Bounds};
/// use std::collections::HashSet;
///
/// let mut pixels = HashSet::new();
/// assert!(polygon(Bounds::UNBOUNDED, &[(0, 0), (3, 0), (3, 3), (0, 3)], |x, y| {
///     pixels.insert((x, y));
/// }));
/// assert_eq!(pixels.len(), 16);
/// ```
pub fn polygon<F: FnMut(i32, i32)>(clip: Bounds, vertices: &[(i32, i32)], mut plot: F) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let min_y = vertices.iter().map(|&(_, y)| y).min().unwrap_or(0).max(clip.min_y);
    let max_y = vertices.iter().map(|&(_, y)| y).max().unwrap_or(0).min(clip.max_y);

    let mut intersections: Vec<i64> = Vec::with_capacity(vertices.len());
    for y in min_y..=max_y {
        intersections.clear();

        for i in 0..vertices.len() {
            let (x1, y1) = vertices[i];
            let (x2, y2) = vertices[(i + 1) % vertices.len()];

            // Horizontal edges are covered by the outline pass
            if y1 == y2 {
                continue;
            }

            if y >= y1.min(y2) && y < y1.max(y2) {
                let t = (f64::from(y) - f64::from(y1)) / (f64::from(y2) - f64::from(y1));
                let x = f64::from(x1) + t * (f64::from(x2) - f64::from(x1));
                intersections.push(x.round() as i64);
            }
        }

        intersections.sort_unstable();

        for pair in intersections.chunks_exact(2) {
            hspan(&clip, pair[0], pair[1], i64::from(y), &mut plot);
        }
    }

    for i in 0..vertices.len() {
        line(clip, vertices[i], vertices[(i + 1) % vertices.len()], &mut plot);
    }

    true
}

fn hspan<F: FnMut(i32, i32)>(clip: &Bounds, x0: i64, x1: i64, y: i64, plot: &mut F) {
    if y < i64::from(clip.min_y) || y > i64::from(clip.max_y) {
        return;
    }
    let start = x0.max(i64::from(clip.min_x));
    let end = x1.min(i64::from(clip.max_x));
    for x in start..=end {
        plot(x as i32, y as i32);
    }
}

fn plot_clipped<F: FnMut(i32, i32)>(clip: &Bounds, x: i64, y: i64, plot: &mut F) {
    if clip.contains(x, y) {
        plot(x as i32, y as i32);
    }
}
