//! Rendered scene cache
//!
//! Owns the rasterized bitmap and priority buffer of every loaded scene so
//! frames only ever copy them. A scene is rasterized on its first lookup and
//! again only when its descriptor fingerprint changes or it is invalidated.

use crate::fingerprint::{fingerprint_descriptor, SceneFingerprint};
use crate::scene::{BuildOptions, RenderedScene, SceneDescriptor, SceneError};
use std::collections::HashMap;
use std::sync::Arc;

/// Default number of scenes kept.
pub const DEFAULT_CAPACITY: usize = 8;

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total lookups
    pub lookups: u64,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to build
    pub misses: u64,
    /// Scene builds performed by the cache
    pub rasterizations: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

#[derive(Debug, Clone)]
struct CachedScene {
    scene: Arc<RenderedScene>,
    fingerprint: SceneFingerprint,
    last_used: u64,
}

/// LRU cache of rendered scenes keyed by scene id.
#[derive(Debug)]
pub struct SceneCache {
    entries: HashMap<String, CachedScene>,
    capacity: usize,
    options: BuildOptions,
    clock: u64,
    stats: CacheStats,
    evicted: Vec<String>,
}

impl SceneCache {
    /// Create a cache holding at most `capacity` scenes (at least one).
    pub fn new(capacity: usize, options: BuildOptions) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            options,
            clock: 0,
            stats: CacheStats::default(),
            evicted: Vec::new(),
        }
    }

    /// Rendered scene for `id`, building it from `desc` on a miss.
    pub fn get(
        &mut self,
        id: &str,
        desc: &SceneDescriptor,
    ) -> Result<Arc<RenderedScene>, SceneError> {
        self.get_with_fingerprint(id, fingerprint_descriptor(desc), desc)
    }

    /// Like [`get`](Self::get) with a fingerprint the caller already holds.
    pub fn get_with_fingerprint(
        &mut self,
        id: &str,
        fingerprint: SceneFingerprint,
        desc: &SceneDescriptor,
    ) -> Result<Arc<RenderedScene>, SceneError> {
        self.stats.lookups += 1;
        self.clock += 1;

        if let Some(entry) = self.entries.get_mut(id) {
            if entry.fingerprint == fingerprint {
                self.stats.hits += 1;
                entry.last_used = self.clock;
                tracing::debug!(scene = id, "scene cache hit");
                return Ok(Arc::clone(&entry.scene));
            }
            tracing::debug!(scene = id, "scene descriptor changed, rebuilding");
        } else {
            tracing::debug!(scene = id, "scene cache miss");
        }

        self.stats.misses += 1;
        let scene = Arc::new(RenderedScene::build(desc, &self.options)?);
        self.stats.rasterizations += 1;
        self.publish(id, fingerprint, Arc::clone(&scene));
        Ok(scene)
    }

    /// Cached scene for `id` without building. Counts as a use for LRU.
    pub fn peek(&mut self, id: &str) -> Option<Arc<RenderedScene>> {
        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(id).map(|entry| {
            entry.last_used = clock;
            Arc::clone(&entry.scene)
        })
    }

    /// Fingerprint of the published scene for `id`.
    pub fn fingerprint(&self, id: &str) -> Option<SceneFingerprint> {
        self.entries.get(id).map(|entry| entry.fingerprint)
    }

    /// Store a scene built elsewhere, replacing any previous version.
    pub fn publish(&mut self, id: &str, fingerprint: SceneFingerprint, scene: Arc<RenderedScene>) {
        self.clock += 1;
        self.entries.insert(
            id.to_string(),
            CachedScene {
                scene,
                fingerprint,
                last_used: self.clock,
            },
        );
        tracing::info!(scene = id, "scene published");

        while self.entries.len() > self.capacity {
            if !self.evict_one(id) {
                break;
            }
        }
    }

    /// Drop the rendered scene so the next lookup rebuilds it.
    pub fn invalidate(&mut self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            tracing::debug!(scene = id, "scene invalidated");
        }
        removed
    }

    /// Release a scene that will not be shown again.
    pub fn unload(&mut self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            tracing::debug!(scene = id, "scene unloaded");
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids evicted for capacity since the last call.
    pub fn drain_evicted(&mut self) -> std::vec::Drain<'_, String> {
        self.evicted.drain(..)
    }

    /// Evict the least recently used entry other than `keep`.
    fn evict_one(&mut self, keep: &str) -> bool {
        let lru_id = self
            .entries
            .iter()
            .filter(|(id, _)| id.as_str() != keep)
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| id.clone());

        match lru_id {
            Some(id) => {
                self.entries.remove(&id);
                self.stats.evictions += 1;
                tracing::debug!(scene = id.as_str(), "scene evicted");
                self.evicted.push(id);
                true
            }
            None => false,
        }
    }
}

impl Default for SceneCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, BuildOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveDesc;

    fn scene(color: &str) -> SceneDescriptor {
        SceneDescriptor::new("black").with_primitive(PrimitiveDesc::Rect {
            dims: [0, 0, 10, 10],
            color: color.into(),
            priority: None,
        })
    }

    #[test]
    fn test_cache_hit_reuses_scene() {
        let mut cache = SceneCache::default();
        let desc = scene("red");

        let first = cache.get("room1", &desc).unwrap();
        let second = cache.get("room1", &desc).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().rasterizations, 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_changed_descriptor_rebuilds() {
        let mut cache = SceneCache::default();
        cache.get("room1", &scene("red")).unwrap();
        let rebuilt = cache.get("room1", &scene("blue")).unwrap();

        assert_eq!(cache.stats().rasterizations, 2);
        assert_eq!(rebuilt.bitmap.get(0, 0).map(|c| c.name()), Some("blue"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut cache = SceneCache::default();
        let desc = scene("red");
        cache.get("room1", &desc).unwrap();
        assert!(cache.invalidate("room1"));
        assert!(!cache.invalidate("room1"));
        cache.get("room1", &desc).unwrap();
        assert_eq!(cache.stats().rasterizations, 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = SceneCache::new(2, BuildOptions::default());
        cache.get("a", &scene("red")).unwrap();
        cache.get("b", &scene("red")).unwrap();
        // Touch "a" so "b" becomes least recently used
        cache.get("a", &scene("red")).unwrap();
        cache.get("c", &scene("red")).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.drain_evicted().collect::<Vec<_>>(), vec!["b".to_string()]);
        assert_eq!(cache.drain_evicted().count(), 0);
    }

    #[test]
    fn test_capacity_floor_is_one() {
        let mut cache = SceneCache::new(0, BuildOptions::default());
        assert_eq!(cache.capacity(), 1);
        cache.get("a", &scene("red")).unwrap();
        cache.get("b", &scene("red")).unwrap();
        assert!(cache.contains("b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unload_and_peek() {
        let mut cache = SceneCache::default();
        cache.get("a", &scene("red")).unwrap();
        assert!(cache.peek("a").is_some());
        assert!(cache.unload("a"));
        assert!(cache.peek("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_strict_error_is_not_cached() {
        let mut cache = SceneCache::new(
            4,
            BuildOptions {
                strict: true,
                ..Default::default()
            },
        );
        assert!(cache.get("bad", &scene("orange")).is_err());
        assert!(!cache.contains("bad"));
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().rasterizations, 0);
    }

    #[test]
    fn test_publish_external_build() {
        let mut cache = SceneCache::default();
        let desc = scene("green");
        let fp = fingerprint_descriptor(&desc);
        let built = Arc::new(RenderedScene::build(&desc, &BuildOptions::default()).unwrap());
        cache.publish("room", fp, built);

        assert_eq!(cache.fingerprint("room"), Some(fp));
        cache.get("room", &desc).unwrap();
        assert_eq!(cache.stats().rasterizations, 0);
        assert_eq!(cache.stats().hits, 1);
    }
}
