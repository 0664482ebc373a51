//! # Entity Shortener
//!
//! Collision-free public slugs for application entities, and resolution of
//! those slugs back to the entities.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Data model and collaborator traits
//! - **Application Layer** ([`application`]) - Generation engine, resolution and the [`EntityShortener`] facade
//! - **Infrastructure Layer** ([`infrastructure`]) - Caches and storage backends (memory, PostgreSQL, Redis)
//! - **Utilities** ([`utils`]) - Code generation, slug derivation, templates and URL assembly
//!
//! ## Generation modes
//!
//! - **Shortening**: random codes from a 62-symbol alphabet, retried on collision
//! - **Framework**: readable slugs derived from entity ids, failing on collision
//! - **Pattern**: a public id placed into a template such as `summer-sale-{publicId}`
//!
//! ## Quick Start
//!
//! ```ignore
//! use entity_shortener::prelude::*;
//! use std::sync::Arc;
//!
//! let shortener = EntityShortener::new(
//!     Arc::new(InMemoryStorage::new()),
//!     ShortenerSettings::new("yourdomain.co"),
//! );
//!
//! let result = shortener.create("product", "42", GenerateOptions::new()).await;
//! if result.success {
//!     println!("{}", result.url.unwrap());
//! }
//! ```
//!
//! ## Configuration
//!
//! The `shortener` binary reads its configuration from environment variables
//! via [`config::Config`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use application::EntityShortener;
pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::EntityShortener;
    pub use crate::application::services::{MAX_ATTEMPTS, SlugRules};
    pub use crate::domain::entities::{
        BatchItem, BatchSummary, EntityMapping, EntityRecord, GenerateOptions, GenerationMode,
        GenerationResult, LinkAnalytics, ResolutionResult, ResolutionSettings,
        ResolutionStrategy, ShortenerSettings,
    };
    pub use crate::domain::repositories::{ExistenceCheck, StorageAdapter};
    pub use crate::error::{AppError, ErrorInfo};
    pub use crate::infrastructure::cache::CacheStats;
    pub use crate::infrastructure::persistence::{
        InMemoryStorage, PgStorage, PgStorageOptions, RedisStorage,
    };
    pub use crate::utils::code_generator::{SlugMode, generate_code, is_valid_slug};
    pub use crate::utils::slug::derive_slug;
    pub use crate::utils::url_builder::build_public_url;
}
