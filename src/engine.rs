//! The render API: scenes in, frames out.
//!
//! [`Engine`] ties the scene cache, background loader and compositor
//! together. The host drives it from a single thread: [`Engine::tick`] once
//! per loop iteration to advance sprites on a fixed timestep, then
//! [`Engine::render_frame`] to get the frame to present. Nothing on that
//! path blocks; scene builds requested with [`Engine::request_scene`] finish
//! on worker threads and are picked up at the next tick.

use crate::animator::SpriteEvent;
use crate::arena::{SpriteArena, SpriteHandle};
use crate::cache::{CacheStats, SceneCache, DEFAULT_CAPACITY};
use crate::compositor::Compositor;
use crate::fingerprint::{fingerprint_descriptor, SceneFingerprint};
use crate::framebuffer::Framebuffer;
use crate::loader::SceneLoader;
use crate::palette::PaletteIndex;
use crate::priority::PriorityBands;
use crate::scene::{BuildOptions, RenderedScene, SceneDescriptor, SceneError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default simulation rate.
pub const DEFAULT_TICK_HZ: u32 = 60;

/// Default cap on simulation steps per tick.
pub const DEFAULT_MAX_STEPS: u32 = 5;

/// Fixed-timestep accumulator.
///
/// Real elapsed time goes in, a whole number of fixed steps comes out. A
/// long stall never produces more than `max_steps` steps; the backlog
/// beyond that is dropped so the simulation does not spiral.
///
/// ```
/// use bandpaint::engine::FrameClock;
/// use std::time::Duration;
///
/// let mut clock = FrameClock::new(60, 5);
/// assert_eq!(clock.advance(Duration::from_millis(10)), 0);
/// assert_eq!(clock.advance(Duration::from_millis(10)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameClock {
    step: Duration,
    accumulator: Duration,
    max_steps: u32,
}

impl FrameClock {
    pub fn new(tick_hz: u32, max_steps: u32) -> Self {
        let tick_hz = tick_hz.max(1);
        Self {
            step: Duration::from_secs(1) / tick_hz,
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Step length in milliseconds.
    pub fn step_ms(&self) -> f64 {
        self.step.as_secs_f64() * 1000.0
    }

    /// Add elapsed time and return how many fixed steps to run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let due = self.accumulator.as_nanos() / self.step.as_nanos().max(1);
        let steps = due.min(u128::from(self.max_steps)) as u32;
        self.accumulator -= self.step * steps;

        if due > u128::from(self.max_steps) {
            tracing::debug!(due = due as u64, ran = steps, "frame clock dropped backlog");
            self.accumulator = Duration::ZERO;
        }
        steps
    }

    /// Fraction of a step accumulated but not yet run.
    pub fn alpha(&self) -> f64 {
        self.accumulator.as_secs_f64() / self.step.as_secs_f64()
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_HZ, DEFAULT_MAX_STEPS)
    }
}

/// Engine construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub strict: bool,
    pub cache_capacity: usize,
    /// Shown while no scene is ready
    pub placeholder: PaletteIndex,
    pub default_bands: PriorityBands,
    pub tick_hz: u32,
    pub max_steps: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict: false,
            cache_capacity: DEFAULT_CAPACITY,
            placeholder: PaletteIndex::BLACK,
            default_bands: PriorityBands::standard(),
            tick_hz: DEFAULT_TICK_HZ,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl EngineOptions {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            strict: self.strict,
            default_bands: self.default_bands.clone(),
        }
    }
}

/// Outcome of a background scene build.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// The scene is published and now current
    Ready { id: String },
    /// The build failed; the previous scene stays current
    Failed { id: String, error: SceneError },
}

#[derive(Debug, Clone)]
struct SceneSource {
    desc: Arc<SceneDescriptor>,
    fingerprint: SceneFingerprint,
}

pub struct Engine {
    options: EngineOptions,
    cache: SceneCache,
    loader: SceneLoader,
    compositor: Compositor,
    clock: FrameClock,
    sources: HashMap<String, SceneSource>,
    pending: Option<(String, Arc<SceneDescriptor>)>,
    current: Option<String>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            cache: SceneCache::new(options.cache_capacity, options.build_options()),
            loader: SceneLoader::new(),
            compositor: Compositor::new(),
            clock: FrameClock::new(options.tick_hz, options.max_steps),
            sources: HashMap::new(),
            pending: None,
            current: None,
            options,
        }
    }

    /// Build `desc` now and make it the current scene.
    ///
    /// Supersedes any background load in flight.
    pub fn load_scene(
        &mut self,
        id: &str,
        desc: SceneDescriptor,
    ) -> Result<Arc<RenderedScene>, SceneError> {
        self.cancel_loading();
        let source = SceneSource {
            fingerprint: fingerprint_descriptor(&desc),
            desc: Arc::new(desc),
        };
        let scene = self
            .cache
            .get_with_fingerprint(id, source.fingerprint, &source.desc)?;
        self.sources.insert(id.to_string(), source);
        self.current = Some(id.to_string());
        self.forget_evicted();
        Ok(scene)
    }

    /// Start building `desc` in the background; it becomes current when
    /// [`poll_loading`](Self::poll_loading) picks it up.
    pub fn request_scene(&mut self, id: &str, desc: SceneDescriptor) -> u64 {
        let desc = Arc::new(desc);
        self.pending = Some((id.to_string(), Arc::clone(&desc)));
        self.loader.request(id, desc, self.options.build_options())
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Drop the background load in flight, if any.
    pub fn cancel_loading(&mut self) {
        self.loader.cancel();
        self.pending = None;
    }

    /// Publish a finished background build. Never blocks.
    pub fn poll_loading(&mut self) -> Option<LoadEvent> {
        let loaded = self.loader.poll()?;
        Some(self.accept_load(loaded))
    }

    /// Block up to `timeout` for the background build in flight.
    pub fn wait_loading(&mut self, timeout: Duration) -> Option<LoadEvent> {
        let loaded = self.loader.wait(timeout)?;
        Some(self.accept_load(loaded))
    }

    fn accept_load(&mut self, loaded: crate::loader::LoadedScene) -> LoadEvent {
        let pending = self.pending.take();
        match loaded.result {
            Ok(scene) => {
                self.cache.publish(&loaded.id, loaded.fingerprint, scene);
                if let Some((id, desc)) = pending.filter(|(id, _)| *id == loaded.id) {
                    self.sources.insert(
                        id,
                        SceneSource {
                            desc,
                            fingerprint: loaded.fingerprint,
                        },
                    );
                }
                self.current = Some(loaded.id.clone());
                self.forget_evicted();
                LoadEvent::Ready { id: loaded.id }
            }
            Err(error) => {
                tracing::warn!(scene = loaded.id.as_str(), %error, "scene build failed");
                LoadEvent::Failed {
                    id: loaded.id,
                    error,
                }
            }
        }
    }

    /// Drop the descriptors of scenes the cache evicted, unless current.
    ///
    /// An evicted scene is gone like an unloaded one; showing it again
    /// takes a fresh `load_scene` or `request_scene`.
    fn forget_evicted(&mut self) {
        for id in self.cache.drain_evicted() {
            if self.current.as_deref() != Some(id.as_str()) {
                self.sources.remove(&id);
            }
        }
    }

    /// Drop the rendered scene so it is rebuilt on next use.
    pub fn invalidate_scene(&mut self, id: &str) -> bool {
        self.cache.invalidate(id)
    }

    /// Forget a scene entirely.
    pub fn unload_scene(&mut self, id: &str) -> bool {
        let known = self.sources.remove(id).is_some();
        let cached = self.cache.unload(id);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        known || cached
    }

    /// Make an already loaded scene current.
    pub fn switch_scene(&mut self, id: &str) -> bool {
        if self.sources.contains_key(id) {
            self.current = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn current_scene(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current rendered scene, rebuilding it if it was invalidated.
    pub fn scene(&mut self) -> Option<Arc<RenderedScene>> {
        let id = self.current.as_deref()?;
        let source = self.sources.get(id)?;
        let scene = match self
            .cache
            .get_with_fingerprint(id, source.fingerprint, &source.desc)
        {
            Ok(scene) => Some(scene),
            Err(error) => {
                tracing::warn!(scene = id, %error, "current scene failed to rebuild");
                None
            }
        };
        self.forget_evicted();
        scene
    }

    /// Compose the current scene with `sprites`.
    ///
    /// Without a ready scene the frame is the placeholder color.
    pub fn render_frame(&mut self, sprites: &SpriteArena) -> &Framebuffer {
        match self.scene() {
            Some(scene) => self.compositor.compose(&scene, sprites),
            None => self.compositor.fill(self.options.placeholder),
        }
    }

    /// Advance the simulation by real elapsed time.
    ///
    /// Picks up finished loads first, then runs as many fixed steps as are
    /// due. Returns the number of steps run.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        sprites: &mut SpriteArena,
        events: &mut Vec<(SpriteHandle, SpriteEvent)>,
    ) -> u32 {
        if let Some(LoadEvent::Failed { id, error }) = self.poll_loading() {
            tracing::debug!(scene = id.as_str(), %error, "keeping previous scene");
        }

        let steps = self.clock.advance(elapsed);
        let step_ms = self.clock.step_ms();
        for _ in 0..steps {
            sprites.update_all(step_ms, events);
        }
        steps
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}
