//! Layout height cache keyed by item identity and available width.
//!
//! Purely derived data: any entry can be rebuilt by measuring again, so losing
//! entries costs time, never correctness. The cache is owned by the engine and
//! only touched from the engine's task; it needs no locking.

use crate::model::ItemId;
use crate::view_state::types::{Height, Width};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Key for height cache lookup.
///
/// Content state (expanded or not) is deliberately absent from the key: a
/// content mutation clears the whole cache instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeightKey {
    /// Item identity.
    pub item: ItemId,
    /// Width the item was measured at.
    pub width: Width,
}

impl HeightKey {
    /// Create new height cache key.
    pub fn new(item: ItemId, width: Width) -> Self {
        Self { item, width }
    }
}

/// Configuration for the height cache.
///
/// Loaded from the `height_cache_capacity` config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(default)]
pub struct HeightCacheConfig {
    /// Maximum number of cached heights; `None` keeps every entry until
    /// `clear()`.
    pub capacity: Option<usize>,
}

/// Height cache with optional LRU bound.
///
/// Unbounded by default: a screen session only ever holds the reviews it has
/// paged in. With a capacity, the least recently used entry is evicted first.
pub struct HeightCache {
    cache: LruCache<HeightKey, Height>,
}

impl HeightCache {
    /// Create a new cache.
    ///
    /// `None` or `Some(0)` yields an unbounded cache.
    pub fn new(capacity: Option<usize>) -> Self {
        let cache = match capacity.and_then(NonZeroUsize::new) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self { cache }
    }

    /// Create from config.
    pub fn from_config(config: &HeightCacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Cached height, if present. Never measures.
    ///
    /// Updates LRU ordering (most recently used).
    pub fn get(&mut self, key: &HeightKey) -> Option<Height> {
        self.cache.get(key).copied()
    }

    /// Store a measured height. Last write wins.
    ///
    /// Overwriting is safe: measuring the same content at the same width always
    /// yields the same height.
    pub fn set(&mut self, key: HeightKey, height: Height) {
        self.cache.put(key, height);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for HeightCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for HeightCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightCache")
            .field("len", &self.cache.len())
            .field("capacity", &self.cache.cap())
            .finish()
    }
}
