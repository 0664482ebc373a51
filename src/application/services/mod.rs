//! Generation and resolution services.

pub mod collision_checker;
pub mod resolution_service;
pub mod slug_service;

pub use collision_checker::CollisionChecker;
pub use resolution_service::{ResolutionService, SlugRules};
pub use slug_service::{MAX_ATTEMPTS, SlugService};
