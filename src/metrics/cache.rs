//! Resolved rendition metrics, cached so that relayouts never re-fetch.
//!
//! Keys are xxh3 hashes of the rendition locator.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::PhotoItem;

/// Outcome of resolving one item's intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricOutcome {
    Resolved { width: u32, height: u32 },
    Failed,
}

impl MetricOutcome {
    /// Footprint height at `column_width`, or `fallback` when unresolved.
    pub fn height_at(&self, column_width: f32, fallback: f32) -> f32 {
        match *self {
            Self::Resolved { width, height } if width > 0 => {
                column_width * height as f32 / width as f32
            }
            _ => fallback,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Shared LRU cache of metric outcomes.
#[derive(Clone)]
pub struct MetricsCache {
    entries: Arc<Mutex<LruCache<u64, MetricOutcome>>>,
}

impl MetricsCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn key_for(locator: &str) -> u64 {
        xxh3_64(locator.as_bytes())
    }

    pub fn get(&self, locator: &str) -> Option<MetricOutcome> {
        self.entries.lock().get(&Self::key_for(locator)).copied()
    }

    pub fn insert(&self, locator: &str, outcome: MetricOutcome) {
        self.entries.lock().put(Self::key_for(locator), outcome);
    }

    /// Outcome known without touching the rendition: from the item itself or the cache.
    pub fn lookup(&self, item: &PhotoItem) -> Option<MetricOutcome> {
        if let Some((width, height)) = item.dimensions() {
            return Some(MetricOutcome::Resolved { width, height });
        }
        self.get(&item.rendition.reduced)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
