//! LRU cache of page bounds
//!
//! Optional memoization of `page.bounds(zoom)`. The key carries the zoom,
//! so a zoom change can never serve stale bounds; entries for old zooms
//! simply age out. A relayout at the same zoom is not visible in the key,
//! so the owner must feed navigator effects through
//! [`BoundsCache::apply_effects`]. The cache belongs to a single owner and is
//! never stored inside a [`ViewState`].

use std::num::NonZeroUsize;

use log::debug;
use lru::LruCache;

use crate::geometry::Rect;
use crate::model::Page;
use crate::navigator::Effect;
use crate::view_state::ViewState;

/// Cache key for page bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundsKey {
    /// Page index
    pub page: usize,
    /// Zoom factor bits, exact match only
    pub zoom_bits: u32,
}

impl BoundsKey {
    #[must_use]
    pub fn new(page: usize, zoom: f32) -> Self {
        Self {
            page,
            zoom_bits: zoom.to_bits(),
        }
    }
}

/// LRU cache of page bounds keyed by (page, zoom)
pub struct BoundsCache {
    cache: LruCache<BoundsKey, Rect>,
}

impl BoundsCache {
    /// Create a new cache with the given capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Cache sized from settings; `None` when the cache is disabled
    #[must_use]
    pub fn from_capacity(capacity: usize) -> Option<Self> {
        (capacity > 0).then(|| Self::new(capacity))
    }

    /// Bounds of `page` at the state's zoom, computed on a miss
    pub fn bounds(&mut self, state: &ViewState, page: &Page) -> Rect {
        let key = BoundsKey::new(page.index, state.zoom);
        *self.cache.get_or_insert(key, || state.bounds(page))
    }

    /// Check if a key is in the cache without promoting it
    #[must_use]
    pub fn contains(&self, key: &BoundsKey) -> bool {
        self.cache.contains(key)
    }

    /// Clear all cached bounds
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    /// Drop every entry when `effects` report stale bounds.
    ///
    /// Returns true if the cache was cleared.
    pub fn apply_effects(&mut self, effects: &[Effect]) -> bool {
        if !effects.contains(&Effect::InvalidateBounds) {
            return false;
        }
        debug!("Invalidating {} cached page bounds", self.cache.len());
        self.invalidate_all();
        true
    }

    /// Invalidate all cached zoom levels of a specific page
    pub fn invalidate_page(&mut self, page: usize) {
        let keys_to_remove: Vec<_> = self
            .cache
            .iter()
            .filter(|(k, _)| k.page == page)
            .map(|(k, _)| *k)
            .collect();

        for key in keys_to_remove {
            self.cache.pop(&key);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}
