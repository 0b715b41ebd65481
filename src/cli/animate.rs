//! Animate command implementation
//!
//! Drives the engine at its fixed step for a number of frames and writes the
//! composed frames as a GIF. Sprites come from a placement file:
//!
//! ```json
//! [
//!   {"view": "ego", "loop": "walk", "x": 40, "y": 120,
//!    "move_to": {"x": 260, "y": 140}, "move_ms": 3000, "easing": "linear"},
//!   {"view": "tree", "x": 150, "y": 100, "priority": 9}
//! ]
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::animator::SpriteInstance;
use crate::arena::SpriteArena;
use crate::config::CliOverrides;
use crate::engine::Engine;
use crate::gif::render_gif;
use crate::motion::{Interpolation, Point2D};
use crate::suggest::{format_suggestion, nearest};
use crate::view::{load_views, View};

use super::{load_settings, read_scene, report, scene_id, EXIT_SUCCESS};

/// One sprite to place before the first frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SpritePlacement {
    pub view: String,
    #[serde(default, rename = "loop")]
    pub loop_name: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Fixed priority instead of the band under the sprite's baseline
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub mirror: bool,
    #[serde(default = "default_play")]
    pub play: bool,
    #[serde(default)]
    pub move_to: Option<Point2D>,
    #[serde(default = "default_move_ms")]
    pub move_ms: f64,
    #[serde(default)]
    pub easing: Interpolation,
}

fn default_play() -> bool {
    true
}

fn default_move_ms() -> f64 {
    1000.0
}

/// Execute the animate command
pub fn run_animate(
    scene: &Path,
    views: &Path,
    sprites: &Path,
    frames: u32,
    output: &Path,
    config_path: Option<&Path>,
    overrides: CliOverrides,
) -> ExitCode {
    match animate(scene, views, sprites, frames, output, config_path, &overrides) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => report(e),
    }
}

fn animate(
    scene: &Path,
    views: &Path,
    sprites: &Path,
    frame_count: u32,
    output: &Path,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> anyhow::Result<()> {
    let config = load_settings(config_path, overrides)?;
    let desc = read_scene(scene)?;
    let library = read_views(views)?;
    let placements = read_placements(sprites)?;

    let mut engine = Engine::new(config.engine_options());
    let rendered = engine
        .load_scene(&scene_id(scene), desc)
        .with_context(|| format!("cannot render '{}'", scene.display()))?;
    for warning in &rendered.warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut arena = SpriteArena::new();
    for (i, placement) in placements.iter().enumerate() {
        let sprite = place_sprite(&library, placement)
            .with_context(|| format!("sprite {} in '{}'", i, sprites.display()))?;
        arena.insert(sprite);
    }

    let step = engine.clock().step();
    let frame_ms = engine.clock().step_ms().round() as u32;
    let mut frames = Vec::with_capacity(frame_count as usize);
    let mut events = Vec::new();
    for i in 0..frame_count {
        if i > 0 {
            engine.tick(step, &mut arena, &mut events);
        }
        frames.push(engine.render_frame(&arena).clone());
    }
    for (handle, event) in &events {
        tracing::debug!(%handle, ?event, "sprite event");
    }

    render_gif(&frames, frame_ms, config.output.scale, output)
        .with_context(|| format!("cannot write '{}'", output.display()))?;
    println!("Saved: {} ({} frames)", output.display(), frames.len());
    Ok(())
}

fn read_views(path: &Path) -> anyhow::Result<Vec<Arc<View>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read views '{}'", path.display()))?;
    let views = load_views(&text).with_context(|| format!("in '{}'", path.display()))?;
    Ok(views.into_iter().map(Arc::new).collect())
}

fn read_placements(path: &Path) -> anyhow::Result<Vec<SpritePlacement>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read sprites '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("in '{}'", path.display()))
}

/// Build a sprite instance from a placement.
pub(crate) fn place_sprite(
    library: &[Arc<View>],
    placement: &SpritePlacement,
) -> anyhow::Result<SpriteInstance> {
    let Some(view) = library.iter().find(|v| v.name() == placement.view) else {
        let names: Vec<&str> = library.iter().map(|v| v.name()).collect();
        match format_suggestion(&nearest(&placement.view, &names, 3)) {
            Some(hint) => bail!("unknown view '{}', {}", placement.view, hint),
            None => bail!("unknown view '{}'", placement.view),
        }
    };

    let mut sprite = SpriteInstance::new(Arc::clone(view), Point2D::new(placement.x, placement.y));
    if let Some(name) = &placement.loop_name {
        if let Some(warning) = sprite.set_loop(name) {
            eprintln!("Warning: {}", warning);
        }
    }
    sprite.set_mirrored(placement.mirror);
    sprite.set_fixed_priority(placement.priority);
    if placement.play {
        sprite.play();
    }
    if let Some(to) = placement.move_to {
        sprite.start_move(to, placement.move_ms, placement.easing);
    }
    Ok(sprite)
}
