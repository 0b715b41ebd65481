//! Per-sprite animation and movement state.
//!
//! A [`SpriteInstance`] shows one loop of a shared [`View`] at a position on
//! screen. [`SpriteInstance::update`] advances cel playback and any active
//! movement by a time step, reporting loop completion and arrival as
//! [`SpriteEvent`]s. Playback and movement are independent: a sprite can
//! walk in place, glide without animating, or both.

use crate::motion::{Interpolation, Movement, Point2D};
use crate::priority::{PriorityBands, MAX_PRIORITY};
use crate::view::{Cel, Loop, View};
use crate::warning::Warning;
use std::sync::Arc;

/// Something that happened during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteEvent {
    /// A non-repeating loop reached its last cel
    LoopCompleted { loop_index: usize },
    /// A movement arrived at its destination
    MovementFinished,
}

/// Snapshot of what a sprite is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteState {
    Idle {
        loop_index: usize,
        cel: usize,
    },
    Playing {
        loop_index: usize,
        cel: usize,
        elapsed_ms: f64,
    },
    Moving {
        from: Point2D,
        to: Point2D,
        elapsed_ms: f64,
        duration_ms: f64,
        easing: Interpolation,
    },
}

/// A sprite on screen.
#[derive(Debug, Clone)]
pub struct SpriteInstance {
    view: Arc<View>,
    loop_index: usize,
    cel_index: usize,
    cel_elapsed_ms: f64,
    playing: bool,
    position: Point2D,
    movement: Option<Movement>,
    fixed_priority: Option<u8>,
    mirrored: bool,
    visible: bool,
}

impl SpriteInstance {
    /// A visible, idle sprite showing the first cel of the view's first loop.
    pub fn new(view: Arc<View>, position: Point2D) -> Self {
        Self {
            view,
            loop_index: 0,
            cel_index: 0,
            cel_elapsed_ms: 0.0,
            playing: false,
            position,
            movement: None,
            fixed_priority: None,
            mirrored: false,
            visible: true,
        }
    }

    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    pub fn loop_index(&self) -> usize {
        self.loop_index
    }

    pub fn cel_index(&self) -> usize {
        self.cel_index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn movement(&self) -> Option<&Movement> {
        self.movement.as_ref()
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fixed_priority(&self) -> Option<u8> {
        self.fixed_priority
    }

    /// Current state; a movement in progress takes precedence.
    pub fn state(&self) -> SpriteState {
        if let Some(m) = &self.movement {
            return SpriteState::Moving {
                from: m.from,
                to: m.to,
                elapsed_ms: m.elapsed_ms,
                duration_ms: m.duration_ms,
                easing: m.easing,
            };
        }
        if self.playing {
            SpriteState::Playing {
                loop_index: self.loop_index,
                cel: self.cel_index,
                elapsed_ms: self.cel_elapsed_ms,
            }
        } else {
            SpriteState::Idle {
                loop_index: self.loop_index,
                cel: self.cel_index,
            }
        }
    }

    fn current_loop(&self) -> &Loop {
        // loop_index is only ever set to a valid index of this view
        &self.view.loops()[self.loop_index]
    }

    /// The cel to draw this frame.
    pub fn current_cel(&self) -> &Cel {
        &self.current_loop().cels[self.cel_index]
    }

    /// Switch to the loop called `name` and start playing it from cel 0.
    ///
    /// An unknown name falls back to the view's first loop and returns a
    /// warning.
    pub fn set_loop(&mut self, name: &str) -> Option<Warning> {
        let (index, warning) = match self.view.loop_index(name) {
            Some(index) => (index, None),
            None => (
                0,
                Some(Warning::emit(format!(
                    "view '{}' has no loop '{}', using '{}'",
                    self.view.name(),
                    name,
                    self.view.loops()[0].name
                ))),
            ),
        };
        self.loop_index = index;
        self.cel_index = 0;
        self.cel_elapsed_ms = 0.0;
        self.playing = true;
        warning
    }

    /// Jump to cel `index` of the current loop.
    ///
    /// Out of range falls back to cel 0 and returns a warning.
    pub fn set_cel(&mut self, index: usize) -> Option<Warning> {
        let count = self.current_loop().cels.len();
        self.cel_elapsed_ms = 0.0;
        if index < count {
            self.cel_index = index;
            None
        } else {
            self.cel_index = 0;
            Some(Warning::emit(format!(
                "loop '{}' of view '{}' has {} cels, cel {} requested, using cel 0",
                self.current_loop().name,
                self.view.name(),
                count,
                index
            )))
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Place the sprite, cancelling any movement.
    pub fn set_position(&mut self, position: Point2D) {
        self.position = position;
        self.movement = None;
    }

    /// Start moving from the current position to `to`.
    pub fn start_move(&mut self, to: Point2D, duration_ms: f64, easing: Interpolation) {
        self.movement = Some(Movement::new(self.position, to, duration_ms, easing));
    }

    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Pin the sprite to a priority instead of its baseline band.
    pub fn set_fixed_priority(&mut self, priority: Option<u8>) {
        self.fixed_priority = priority.map(|p| p.min(MAX_PRIORITY));
    }

    /// Screen row of the bottom edge of the current cel.
    pub fn baseline_y(&self) -> i32 {
        self.position.y.round() as i32 + self.current_cel().height() as i32 - 1
    }

    /// Priority used for occlusion tests this frame.
    pub fn effective_priority(&self, bands: &PriorityBands, screen_height: u32) -> u8 {
        self.fixed_priority
            .unwrap_or_else(|| bands.priority_for_y(self.baseline_y(), screen_height))
    }

    /// Advance playback and movement by `dt_ms`, pushing any events.
    ///
    /// Negative, NaN and infinite steps advance nothing.
    pub fn update(&mut self, dt_ms: f64, events: &mut Vec<SpriteEvent>) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        if self.playing {
            self.advance_cels(dt_ms, events);
        }

        if let Some(movement) = &mut self.movement {
            movement.advance(dt_ms);
            self.position = movement.position();
            if movement.is_finished() {
                self.movement = None;
                events.push(SpriteEvent::MovementFinished);
            }
        }
    }

    fn advance_cels(&mut self, dt_ms: f64, events: &mut Vec<SpriteEvent>) {
        let loop_index = self.loop_index;
        let current = &self.view.loops()[loop_index];
        let count = current.cels.len();
        let duration = |cel: &Cel| f64::from(cel.duration_ms().max(1));

        self.cel_elapsed_ms += dt_ms;

        // Skip whole cycles of a repeating loop at once
        if current.repeat {
            let total: f64 = current.cels.iter().map(duration).sum();
            if self.cel_elapsed_ms >= total {
                self.cel_elapsed_ms %= total;
            }
        }

        loop {
            let cel_duration = duration(&current.cels[self.cel_index]);
            if self.cel_elapsed_ms < cel_duration {
                break;
            }
            self.cel_elapsed_ms -= cel_duration;

            if self.cel_index + 1 < count {
                self.cel_index += 1;
            } else if current.repeat {
                self.cel_index = 0;
            } else {
                self.cel_elapsed_ms = 0.0;
                self.playing = false;
                events.push(SpriteEvent::LoopCompleted { loop_index });
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cel(duration_ms: u32, rows: &[&str]) -> Cel {
        Cel::from_rows(rows, duration_ms).unwrap()
    }

    fn test_view() -> Arc<View> {
        Arc::new(
            View::new(
                "ego",
                vec![
                    Loop {
                        name: "walk".to_string(),
                        repeat: true,
                        cels: vec![cel(100, &["1"]), cel(100, &["2"]), cel(100, &["3"])],
                    },
                    Loop {
                        name: "wave".to_string(),
                        repeat: false,
                        cels: vec![cel(50, &["4", "4"]), cel(50, &["5", "5"])],
                    },
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_new_sprite_is_idle() {
        let sprite = SpriteInstance::new(test_view(), Point2D::new(10.0, 20.0));
        assert_eq!(sprite.state(), SpriteState::Idle { loop_index: 0, cel: 0 });
        assert!(sprite.is_visible());
    }

    #[test]
    fn test_repeating_loop_wraps() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::default());
        assert!(sprite.set_loop("walk").is_none());
        let mut events = Vec::new();

        sprite.update(99.0, &mut events);
        assert_eq!(sprite.cel_index(), 0);
        sprite.update(1.0, &mut events);
        assert_eq!(sprite.cel_index(), 1);
        sprite.update(200.0, &mut events);
        assert_eq!(sprite.cel_index(), 0);
        assert!(events.is_empty());
        assert!(sprite.is_playing());
    }

    #[test]
    fn test_large_step_skips_whole_cycles() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::default());
        sprite.set_loop("walk");
        let mut events = Vec::new();
        sprite.update(300.0 * 1000.0 + 150.0, &mut events);
        assert_eq!(sprite.cel_index(), 1);
    }

    #[test]
    fn test_non_repeating_loop_holds_last_cel() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::default());
        sprite.set_loop("wave");
        let mut events = Vec::new();

        sprite.update(50.0, &mut events);
        assert_eq!(sprite.cel_index(), 1);
        assert!(events.is_empty());

        sprite.update(50.0, &mut events);
        assert_eq!(sprite.cel_index(), 1);
        assert_eq!(events, vec![SpriteEvent::LoopCompleted { loop_index: 1 }]);
        assert_eq!(sprite.state(), SpriteState::Idle { loop_index: 1, cel: 1 });

        sprite.update(500.0, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_zero_duration_cel_counts_as_one_ms() {
        let view = Arc::new(
            View::new(
                "blink",
                vec![Loop {
                    name: "idle".to_string(),
                    repeat: true,
                    cels: vec![cel(0, &["1"]), cel(0, &["2"])],
                }],
            )
            .unwrap(),
        );
        let mut sprite = SpriteInstance::new(view, Point2D::default());
        sprite.play();
        let mut events = Vec::new();
        sprite.update(1.0, &mut events);
        assert_eq!(sprite.cel_index(), 1);
    }

    #[test]
    fn test_unknown_loop_falls_back() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::default());
        sprite.set_loop("wave");
        let warning = sprite.set_loop("swim").unwrap();
        assert!(warning.message.contains("swim"));
        assert_eq!(sprite.loop_index(), 0);
        assert!(sprite.is_playing());
    }

    #[test]
    fn test_out_of_range_cel_falls_back() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::default());
        assert!(sprite.set_cel(2).is_none());
        assert_eq!(sprite.cel_index(), 2);
        assert!(sprite.set_cel(7).is_some());
        assert_eq!(sprite.cel_index(), 0);
    }

    #[test]
    fn test_movement_lands_exactly() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::new(0.0, 0.0));
        let to = Point2D::new(33.3, 77.7);
        sprite.start_move(to, 1000.0, Interpolation::EaseInOut);
        assert!(matches!(sprite.state(), SpriteState::Moving { .. }));

        let mut events = Vec::new();
        for _ in 0..7 {
            sprite.update(1000.0 / 7.0, &mut events);
        }
        sprite.update(1.0, &mut events);
        assert_eq!(sprite.position(), to);
        assert_eq!(events, vec![SpriteEvent::MovementFinished]);
        assert!(sprite.movement().is_none());
    }

    #[test]
    fn test_movement_midpoint_is_eased() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::new(0.0, 0.0));
        sprite.start_move(Point2D::new(100.0, 0.0), 1000.0, Interpolation::EaseIn);
        let mut events = Vec::new();
        sprite.update(500.0, &mut events);
        assert!((sprite.position().x - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_priority() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::new(0.0, 149.0));
        sprite.set_loop("wave");
        // Two rows tall: baseline is 150
        assert_eq!(sprite.baseline_y(), 150);
        let bands = PriorityBands::standard();
        assert_eq!(sprite.effective_priority(&bands, 200), 11);

        sprite.set_fixed_priority(Some(40));
        assert_eq!(sprite.effective_priority(&bands, 200), MAX_PRIORITY);
    }

    #[test]
    fn test_non_finite_step_is_ignored() {
        let mut sprite = SpriteInstance::new(test_view(), Point2D::new(5.0, 5.0));
        sprite.set_loop("walk");
        sprite.start_move(Point2D::new(50.0, 5.0), 1000.0, Interpolation::Linear);
        let mut events = Vec::new();

        sprite.update(150.0, &mut events);
        let (cel, position) = (sprite.cel_index(), sprite.position());

        for dt in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, -10.0] {
            sprite.update(dt, &mut events);
            assert_eq!(sprite.cel_index(), cel);
            assert_eq!(sprite.position(), position);
        }
        assert!(events.is_empty());
        assert!(sprite.is_playing());
    }
}
