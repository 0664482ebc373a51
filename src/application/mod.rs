//! Application layer: the generation engine, resolution and the
//! [`EntityShortener`] facade tying them to a storage backend.
//!
//! - [`services::SlugService`] - the three generation strategies and the retry policy
//! - [`services::CollisionChecker`] - cache-first existence checks
//! - [`services::ResolutionService`] - slug to entity lookups

pub mod services;
pub mod shortener;

pub use shortener::EntityShortener;
