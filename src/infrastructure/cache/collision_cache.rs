//! Memo of slugs known to be taken, partitioned by entity type.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Hit/miss counters of the [`CollisionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, `0.0` before the first lookup.
    pub ratio: f64,
}

/// Slugs observed to exist, per entity type.
///
/// Only positive answers are stored: presence means "do not reuse", absence
/// means nothing because other writers may have taken the slug since. There is
/// no eviction besides [`CollisionCache::clear`].
#[derive(Debug, Default)]
pub struct CollisionCache {
    taken: Mutex<HashMap<String, HashSet<String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CollisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `slug` is known to be taken, counting a hit or miss.
    ///
    /// Creates the partition for `entity_type` on first use.
    pub fn lookup(&self, entity_type: &str, slug: &str) -> bool {
        let found = {
            let mut taken = self.taken.lock().unwrap_or_else(|e| e.into_inner());
            taken
                .entry(entity_type.to_string())
                .or_default()
                .contains(slug)
        };

        if found {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }

        found
    }

    /// Records that `slug` exists for `entity_type`.
    pub fn remember(&self, entity_type: &str, slug: &str) {
        let mut taken = self.taken.lock().unwrap_or_else(|e| e.into_inner());
        taken
            .entry(entity_type.to_string())
            .or_default()
            .insert(slug.to_string());
    }

    /// Clears one partition, or all of them, and zeroes the counters.
    pub fn clear(&self, entity_type: Option<&str>) {
        {
            let mut taken = self.taken.lock().unwrap_or_else(|e| e.into_inner());
            match entity_type {
                Some(entity_type) => {
                    taken.remove(entity_type);
                }
                None => taken.clear(),
            }
        }

        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        debug!(entity_type = ?entity_type, "collision cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            ratio: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }

    /// Number of remembered slugs for `entity_type`.
    pub fn len(&self, entity_type: &str) -> usize {
        let taken = self.taken.lock().unwrap_or_else(|e| e.into_inner());
        taken.get(entity_type).map_or(0, HashSet::len)
    }
}
