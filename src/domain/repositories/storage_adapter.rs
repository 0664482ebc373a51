//! Storage adapter collaborator: persistence of slug bindings and clicks.

use crate::domain::entities::{EntityMapping, EntityRecord, LinkAnalytics, NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Backing store for short links and the entities they point to.
///
/// Records are keyed by `(entity_type, slug)`; the same slug may exist once
/// per entity type.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryStorage`] - process-local maps
/// - [`crate::infrastructure::persistence::PgStorage`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisStorage`] - Redis
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Prepares the backend (schema, connections). Safe to call more than once.
    async fn initialize(&self) -> Result<(), AppError>;

    /// Persists a new binding.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken for the
    /// entity type.
    async fn save(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Looks up the binding of a slug.
    async fn resolve(&self, entity_type: &str, slug: &str) -> Result<Option<ShortLink>, AppError>;

    async fn exists(&self, entity_type: &str, slug: &str) -> Result<bool, AppError>;

    /// Adds one click and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown slugs.
    async fn increment_clicks(&self, entity_type: &str, slug: &str) -> Result<u64, AppError>;

    async fn get_analytics(
        &self,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<LinkAnalytics>, AppError>;

    /// Reads an entity from its own table by id.
    async fn fetch_entity(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<EntityRecord>, AppError>;

    /// Reads an entity from its own table by its inline slug column.
    async fn fetch_entity_by_slug(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<EntityRecord>, AppError>;

    /// Releases connections. Further calls may fail.
    async fn close(&self) -> Result<(), AppError>;

    async fn health_check(&self) -> bool {
        true
    }

    /// Saves several bindings, stopping at the first failure.
    async fn save_batch(&self, new_links: Vec<NewShortLink>) -> Result<Vec<ShortLink>, AppError> {
        let mut saved = Vec::with_capacity(new_links.len());
        for new_link in new_links {
            saved.push(self.save(new_link).await?);
        }
        Ok(saved)
    }
}
