//! Set resolution and the process-lifetime frame cache.
//!
//! # Cache semantics
//!
//! Static and animated sets live in two independent maps, so a static set and
//! a GIF with the same name never collide. Every key owns a slot guarded by its
//! own lock: the first caller of an uncached key resolves it while holding the
//! slot, concurrent callers of the same key wait and then read the result.
//! Different keys resolve in parallel.
//!
//! Results with zero frames are returned but never stored, and their slot is
//! removed again, so a later request retries the lookup and unknown names do
//! not accumulate in the map.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;

use super::{FrameSequence, SetKey, SetKind};
use crate::assets::{AssetKind, ResourceProvider};
use crate::constants::{ICON_SIZE, MAX_STATIC_FRAMES, STATIC_FRAME_SIZE};
use crate::imaging::{self, Frame, FrameResizer, OffsetPolicy, Size};

/// Canvas sizes used when normalizing freshly decoded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Canvas for frames of static sets.
    pub static_size: Size,
    /// Canvas for frames of GIF sets.
    pub animated_size: Size,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            static_size: Size::square(STATIC_FRAME_SIZE),
            animated_size: Size::square(ICON_SIZE),
        }
    }
}

type Slot = Arc<Mutex<Option<FrameSequence>>>;

/// One name -> sequence map.
#[derive(Default)]
struct SetCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl SetCache {
    fn slot(&self, name: &str) -> Slot {
        Arc::clone(self.slots.lock().entry(name.to_string()).or_default())
    }

    /// Whether `slot` is still the live slot of `name`.
    fn is_current(&self, name: &str, slot: &Slot) -> bool {
        self.slots.lock().get(name).is_some_and(|live| Arc::ptr_eq(live, slot))
    }

    /// Drops the slot of `name` if it is still `slot`.
    fn evict(&self, name: &str, slot: &Slot) {
        let mut slots = self.slots.lock();
        if slots.get(name).is_some_and(|live| Arc::ptr_eq(live, slot)) {
            slots.remove(name);
        }
    }

    fn get(&self, name: &str) -> Option<FrameSequence> {
        let slot = self.slots.lock().get(name).cloned()?;
        let entry = slot.lock();
        entry.clone()
    }

    fn len(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    fn clear(&self) { self.slots.lock().clear(); }
}

/// Resolves named sets to normalized frame sequences and memoizes them.
pub struct SetLoader {
    provider: Arc<dyn ResourceProvider>,
    resizer: FrameResizer,
    options: LoaderOptions,
    static_sets: SetCache,
    animated_sets: SetCache,
    resolutions: AtomicUsize,
}

impl SetLoader {
    /// Creates a loader reading offsets from `provider`'s offsets resource.
    #[must_use]
    pub fn new(provider: Arc<dyn ResourceProvider>, options: LoaderOptions) -> Self {
        let policy = OffsetPolicy::load(provider.as_ref());
        Self::with_policy(provider, Arc::new(policy), options)
    }

    /// Creates a loader with an explicit offset policy.
    #[must_use]
    pub fn with_policy(
        provider: Arc<dyn ResourceProvider>,
        policy: Arc<OffsetPolicy>,
        options: LoaderOptions,
    ) -> Self {
        Self {
            provider,
            resizer: FrameResizer::new(policy),
            options,
            static_sets: SetCache::default(),
            animated_sets: SetCache::default(),
            resolutions: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn ResourceProvider> { &self.provider }

    #[must_use]
    pub const fn resizer(&self) -> &FrameResizer { &self.resizer }

    #[must_use]
    pub const fn options(&self) -> LoaderOptions { self.options }

    const fn cache(&self, kind: SetKind) -> &SetCache {
        match kind {
            SetKind::Static => &self.static_sets,
            SetKind::Animated => &self.animated_sets,
        }
    }

    /// Returns the frames of set `name`, loading them on first use.
    ///
    /// An empty sequence means the set could not be resolved; it is not cached.
    pub fn load(&self, name: &str, kind: SetKind) -> FrameSequence {
        let cache = self.cache(kind);

        loop {
            let slot = cache.slot(name);
            let mut entry = slot.lock();

            if let Some(cached) = entry.as_ref() {
                tracing::debug!(set = name, %kind, "loading set from cache");
                return cached.clone();
            }

            // Evicted by a miss while this caller waited on it.
            if !cache.is_current(name, &slot) {
                continue;
            }

            self.resolutions.fetch_add(1, Ordering::Relaxed);
            let sequence = match kind {
                SetKind::Static => self.load_static(name),
                SetKind::Animated => self.load_animated(name),
            };

            if sequence.is_empty() {
                tracing::debug!(set = name, %kind, "set resolved to no frames, not caching");
                cache.evict(name, &slot);
            } else {
                tracing::debug!(set = name, %kind, frames = sequence.len(), "caching set");
                *entry = Some(sequence.clone());
            }

            return sequence;
        }
    }

    /// [`Self::load`] on the runtime's blocking pool.
    ///
    /// Must be awaited inside a tokio runtime.
    pub async fn load_async(self: &Arc<Self>, name: String, kind: SetKind) -> FrameSequence {
        let loader = Arc::clone(self);
        let task_name = name.clone();

        match tokio::task::spawn_blocking(move || loader.load(&task_name, kind)).await {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::error!(set = %name, %kind, error = %err, "set loading task failed");
                FrameSequence::empty()
            }
        }
    }

    /// Probes `name1` ..= `name10`, skipping frames that are missing or undecodable.
    fn load_static(&self, name: &str) -> FrameSequence {
        let found: Vec<(String, Vec<u8>)> = (1..=MAX_STATIC_FRAMES)
            .map(|index| format!("{name}{index}"))
            .filter_map(|frame_name| {
                let Some(bytes) = self.provider.lookup(&frame_name, AssetKind::Image) else {
                    tracing::debug!(frame = %frame_name, "static frame not found, skipping");
                    return None;
                };
                Some((frame_name, bytes))
            })
            .collect();

        let target = self.options.static_size;
        let frames: Vec<Frame> = found
            .par_iter()
            .filter_map(|(frame_name, bytes)| match image::load_from_memory(bytes) {
                Ok(image) => Some(self.resizer.resize(&image.to_rgba8(), target, frame_name)),
                Err(err) => {
                    tracing::warn!(frame = %frame_name, error = %err, "failed to decode static frame");
                    None
                }
            })
            .collect();

        tracing::debug!(set = name, frames = frames.len(), "loaded static images");
        FrameSequence::normalized(frames, target)
    }

    /// Decodes `name.gif` and normalizes every frame to the animated canvas.
    fn load_animated(&self, name: &str) -> FrameSequence {
        let Some(bytes) = self.provider.lookup(name, AssetKind::Gif) else {
            tracing::debug!(set = name, "gif not found");
            return FrameSequence::empty();
        };

        let target = self.options.animated_size;
        let frames: Vec<Frame> = imaging::gif::decode(&bytes)
            .par_iter()
            .map(|frame| self.resizer.resize(frame, target, name))
            .collect();

        FrameSequence::normalized(frames, target)
    }

    /// Returns the cached sequence for `key` without loading.
    #[must_use]
    pub fn cached(&self, key: &SetKey) -> Option<FrameSequence> { self.cache(key.kind).get(&key.name) }

    #[must_use]
    pub fn is_cached(&self, key: &SetKey) -> bool { self.cached(key).is_some() }

    /// Number of populated entries for `kind`.
    #[must_use]
    pub fn cached_len(&self, kind: SetKind) -> usize { self.cache(kind).len() }

    /// Number of cache misses that went to the resource provider.
    #[must_use]
    pub fn resolutions(&self) -> usize { self.resolutions.load(Ordering::Relaxed) }

    /// Drops every cached set.
    pub fn clear(&self) {
        self.static_sets.clear();
        self.animated_sets.clear();
        tracing::debug!("set cache cleared");
    }
}
