//! Sprite movement: points, easing and timed moves
//!
//! A [`Movement`] carries a sprite from one position to another over a fixed
//! duration. Time is eased before it is used to interpolate, and a finished
//! movement always lands exactly on its destination.
//!
//! # Example
//!
//! ```
//! use bandpaint::motion::{Interpolation, interpolate_point, Point2D};
//!
//! let start = Point2D { x: 0.0, y: 0.0 };
//! let end = Point2D { x: 100.0, y: 50.0 };
//! let mid = interpolate_point(&start, &end, 0.5, Interpolation::Linear);
//! assert_eq!(mid.x, 50.0);
//! assert_eq!(mid.y, 25.0);
//! ```

use serde::{Deserialize, Serialize};

/// A 2D point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Nearest pixel coordinate
    pub fn round(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Easing applied to movement time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Constant speed
    Linear,
    /// Slow start, fast end (acceleration)
    EaseIn,
    /// Fast start, slow end (deceleration)
    EaseOut,
    /// Smooth S-curve (slow start and end)
    #[default]
    EaseInOut,
}

/// Apply easing to a normalized time value (0.0 to 1.0)
///
/// Input outside the unit range is clamped, so the result is always in
/// `0.0..=1.0` and maps 0 to 0 and 1 to 1.
pub fn ease(t: f64, interpolation: Interpolation) -> f64 {
    let t = t.clamp(0.0, 1.0);

    match interpolation {
        Interpolation::Linear => t,

        Interpolation::EaseIn => {
            // Quadratic ease-in: t^2
            t * t
        }

        Interpolation::EaseOut => {
            // Quadratic ease-out: 1 - (1-t)^2
            1.0 - (1.0 - t) * (1.0 - t)
        }

        Interpolation::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
    }
}

/// Interpolate between two points with easing
pub fn interpolate_point(
    start: &Point2D,
    end: &Point2D,
    t: f64,
    interpolation: Interpolation,
) -> Point2D {
    start.lerp(end, ease(t, interpolation))
}

/// A timed move between two positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub from: Point2D,
    pub to: Point2D,
    pub duration_ms: f64,
    pub elapsed_ms: f64,
    pub easing: Interpolation,
}

impl Movement {
    pub fn new(from: Point2D, to: Point2D, duration_ms: f64, easing: Interpolation) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
        }
    }

    /// Normalized progress, 1.0 once the duration has passed.
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Advance by `dt_ms`. Elapsed time never exceeds the duration.
    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
    }

    /// Current position; exactly `to` once finished.
    pub fn position(&self) -> Point2D {
        if self.is_finished() {
            self.to
        } else {
            interpolate_point(&self.from, &self.to, self.progress(), self.easing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lerp() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(100.0, 200.0);

        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.x, 50.0);
        assert_eq!(mid.y, 100.0);

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn test_point_round() {
        assert_eq!(Point2D::new(1.4, 2.6).round(), (1, 3));
        assert_eq!(Point2D::new(-0.6, 0.0).round(), (-1, 0));
    }

    #[test]
    fn test_ease_linear() {
        assert_eq!(ease(0.0, Interpolation::Linear), 0.0);
        assert_eq!(ease(0.5, Interpolation::Linear), 0.5);
        assert_eq!(ease(1.0, Interpolation::Linear), 1.0);
    }

    #[test]
    fn test_ease_in() {
        assert_eq!(ease(0.0, Interpolation::EaseIn), 0.0);
        assert!(ease(0.5, Interpolation::EaseIn) < 0.5);
        assert_eq!(ease(1.0, Interpolation::EaseIn), 1.0);
    }

    #[test]
    fn test_ease_out() {
        assert_eq!(ease(0.0, Interpolation::EaseOut), 0.0);
        assert!(ease(0.5, Interpolation::EaseOut) > 0.5);
        assert_eq!(ease(1.0, Interpolation::EaseOut), 1.0);
    }

    #[test]
    fn test_ease_in_out() {
        assert_eq!(ease(0.0, Interpolation::EaseInOut), 0.0);
        assert!((ease(0.5, Interpolation::EaseInOut) - 0.5).abs() < 1e-12);
        assert!(ease(0.25, Interpolation::EaseInOut) < 0.25);
        assert!(ease(0.75, Interpolation::EaseInOut) > 0.75);
        assert_eq!(ease(1.0, Interpolation::EaseInOut), 1.0);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease(-1.0, Interpolation::EaseIn), 0.0);
        assert_eq!(ease(2.0, Interpolation::EaseOut), 1.0);
    }

    #[test]
    fn test_default_is_ease_in_out() {
        assert_eq!(Interpolation::default(), Interpolation::EaseInOut);
    }

    #[test]
    fn test_movement_boundaries() {
        let from = Point2D::new(0.0, 0.0);
        let to = Point2D::new(100.0, 40.0);
        let mut movement = Movement::new(from, to, 1000.0, Interpolation::EaseInOut);

        assert_eq!(movement.position(), from);

        movement.advance(500.0);
        let mid = movement.position();
        assert!((mid.x - 50.0).abs() < 1e-9);
        assert!((mid.y - 20.0).abs() < 1e-9);

        movement.advance(500.0);
        assert!(movement.is_finished());
        assert_eq!(movement.position(), to);
    }

    #[test]
    fn test_movement_overshoot_clamps() {
        let to = Point2D::new(7.0, 3.0);
        let mut movement = Movement::new(Point2D::default(), to, 100.0, Interpolation::Linear);
        movement.advance(250.0);
        assert_eq!(movement.elapsed_ms, 100.0);
        assert_eq!(movement.position(), to);
    }

    #[test]
    fn test_zero_duration_movement_is_finished() {
        let to = Point2D::new(1.0, 1.0);
        let movement = Movement::new(Point2D::default(), to, 0.0, Interpolation::Linear);
        assert!(movement.is_finished());
        assert_eq!(movement.position(), to);
    }
}
