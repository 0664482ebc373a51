//! In-process caches owned by one shortener instance.
//!
//! - [`CollisionCache`] - slugs known to be taken, with hit/miss statistics
//! - [`ResolutionCache`] - slugs already resolved to their entity
//!
//! Both are plain objects shared through `Arc`; a new instance starts empty.

mod collision_cache;
mod resolution_cache;

pub use collision_cache::{CacheStats, CollisionCache};
pub use resolution_cache::ResolutionCache;
