//! Background scene builds.
//!
//! Builds run on the rayon global pool as pure functions of the descriptor
//! and come back over a channel. Each request gets a generation number; only
//! the latest generation is honored, older results are dropped on arrival.

use crate::fingerprint::{fingerprint_descriptor, SceneFingerprint};
use crate::scene::{BuildOptions, RenderedScene, SceneDescriptor, SceneError};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A finished build for the latest request.
#[derive(Debug)]
pub struct LoadedScene {
    pub id: String,
    pub generation: u64,
    pub fingerprint: SceneFingerprint,
    pub result: Result<Arc<RenderedScene>, SceneError>,
}

struct LoadMsg {
    id: String,
    generation: u64,
    fingerprint: SceneFingerprint,
    result: Result<RenderedScene, SceneError>,
}

/// Dispatches scene builds to worker threads and collects the results.
pub struct SceneLoader {
    tx: Sender<LoadMsg>,
    rx: Receiver<LoadMsg>,
    generation: u64,
    pending: Option<String>,
}

impl SceneLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            generation: 0,
            pending: None,
        }
    }

    /// Start building `desc` as scene `id`, superseding any earlier request.
    pub fn request(
        &mut self,
        id: &str,
        desc: Arc<SceneDescriptor>,
        options: BuildOptions,
    ) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        self.pending = Some(id.to_string());

        let tx = self.tx.clone();
        let id = id.to_string();
        tracing::debug!(scene = id.as_str(), generation, "scene build requested");

        rayon::spawn(move || {
            let fingerprint = fingerprint_descriptor(&desc);
            let result = RenderedScene::build(&desc, &options);
            // The loader may be gone by now; nothing is waiting for the result
            let _ = tx.send(LoadMsg {
                id,
                generation,
                fingerprint,
                result,
            });
        });

        generation
    }

    /// Forget the in-flight request. Its result is dropped when it arrives.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }

    /// Whether a request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Scene id of the outstanding request.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drain finished builds without blocking.
    pub fn poll(&mut self) -> Option<LoadedScene> {
        loop {
            match self.rx.try_recv() {
                Ok(msg) => {
                    if let Some(loaded) = self.accept(msg) {
                        return Some(loaded);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Block up to `timeout` for the current request to finish.
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadedScene> {
        let deadline = Instant::now() + timeout;
        while self.pending.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(msg) => {
                    if let Some(loaded) = self.accept(msg) {
                        return Some(loaded);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
        None
    }

    fn accept(&mut self, msg: LoadMsg) -> Option<LoadedScene> {
        if msg.generation != self.generation || self.pending.is_none() {
            tracing::debug!(
                scene = msg.id.as_str(),
                generation = msg.generation,
                current = self.generation,
                "discarding stale scene build"
            );
            return None;
        }

        self.pending = None;
        Some(LoadedScene {
            id: msg.id,
            generation: msg.generation,
            fingerprint: msg.fingerprint,
            result: msg.result.map(Arc::new),
        })
    }
}

impl Default for SceneLoader {
    fn default() -> Self {
        Self::new()
    }
}
