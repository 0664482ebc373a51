//! Cache-first collision detection.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::repositories::{CheckOutcome, ExistenceCheck};
use crate::infrastructure::cache::{CacheStats, CollisionCache};

/// Answers whether a slug is taken, consulting the [`CollisionCache`] before
/// the backing [`ExistenceCheck`].
///
/// A failing backing check is reported as [`CheckOutcome::Unavailable`],
/// never as a collision, so callers decide whether to go on without
/// collision protection.
pub struct CollisionChecker<E: ExistenceCheck> {
    backing: Arc<E>,
    cache: Arc<CollisionCache>,
}

impl<E: ExistenceCheck> CollisionChecker<E> {
    pub fn new(backing: Arc<E>, cache: Arc<CollisionCache>) -> Self {
        Self { backing, cache }
    }

    pub async fn exists(&self, entity_type: &str, slug: &str) -> CheckOutcome {
        if self.cache.lookup(entity_type, slug) {
            metrics::counter!("slug_collision_cache_hits_total").increment(1);
            debug!(entity_type, slug, "collision cache hit");
            return CheckOutcome::Exists;
        }

        metrics::counter!("slug_collision_cache_misses_total").increment(1);
        debug!(entity_type, slug, "collision cache miss");

        match self.backing.check_exists(entity_type, slug).await {
            Ok(true) => {
                self.cache.remember(entity_type, slug);
                CheckOutcome::Exists
            }
            Ok(false) => CheckOutcome::Absent,
            Err(e) => {
                warn!(entity_type, slug, error = %e, "existence check unavailable");
                CheckOutcome::Unavailable(e.to_string())
            }
        }
    }

    /// Marks a slug as taken, e.g. right after it was saved.
    pub fn remember(&self, entity_type: &str, slug: &str) {
        self.cache.remember(entity_type, slug);
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear(&self, entity_type: Option<&str>) {
        self.cache.clear(entity_type);
    }
}
