//! Slug to entity resolution with an in-process cache.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::domain::entities::{
    EntityRecord, ResolutionResult, ResolutionStrategy, ShortenerSettings,
};
use crate::domain::repositories::StorageAdapter;
use crate::error::AppError;
use crate::infrastructure::cache::ResolutionCache;
use crate::utils::code_generator::{MAX_FRAMEWORK_SLUG_LENGTH, SlugMode, is_valid_slug};

/// Format rules a slug must satisfy before storage is consulted.
///
/// With `length: None`, shortening mode accepts alphabet-only slugs of any
/// length up to [`MAX_FRAMEWORK_SLUG_LENGTH`], which covers per-call id
/// lengths and supplied public ids. Supplied public ids containing `-` only
/// resolve under [`SlugMode::Framework`] rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlugRules {
    pub length: Option<usize>,
    pub mode: SlugMode,
}

impl SlugRules {
    pub fn from_settings(settings: &ShortenerSettings) -> Self {
        Self {
            length: None,
            mode: settings.slug_mode(),
        }
    }

    /// Rules requiring exactly `length` characters in shortening mode.
    pub fn exact(length: usize, mode: SlugMode) -> Self {
        Self {
            length: Some(length),
            mode,
        }
    }

    pub fn accepts(&self, slug: &str) -> bool {
        match (self.length, self.mode) {
            (Some(length), mode) => is_valid_slug(slug, length, mode),
            (None, SlugMode::Shortening) => {
                slug.len() <= MAX_FRAMEWORK_SLUG_LENGTH
                    && is_valid_slug(slug, slug.len(), SlugMode::Shortening)
            }
            (None, SlugMode::Framework) => is_valid_slug(slug, 0, SlugMode::Framework),
        }
    }
}

/// Resolves slugs back to their entities.
///
/// Successful resolutions are memoized in the [`ResolutionCache`] for the
/// lifetime of the cache; failures are never cached.
pub struct ResolutionService<S: StorageAdapter> {
    storage: Arc<S>,
    cache: Arc<ResolutionCache>,
    settings: Arc<ShortenerSettings>,
}

impl<S: StorageAdapter> ResolutionService<S> {
    pub fn new(
        storage: Arc<S>,
        cache: Arc<ResolutionCache>,
        settings: Arc<ShortenerSettings>,
    ) -> Self {
        Self {
            storage,
            cache,
            settings,
        }
    }

    /// Resolves `slug` using the configured slug rules.
    pub async fn resolve(&self, entity_type: &str, slug: &str) -> ResolutionResult {
        self.resolve_with_rules(entity_type, slug, SlugRules::from_settings(&self.settings))
            .await
    }

    /// Resolves `slug`, validating its format against `rules`.
    pub async fn resolve_with_rules(
        &self,
        entity_type: &str,
        slug: &str,
        rules: SlugRules,
    ) -> ResolutionResult {
        match self.try_resolve(entity_type, slug, rules).await {
            Ok((entity, from_cache)) => ResolutionResult::found(entity, from_cache),
            Err(e) => {
                debug!(entity_type, slug, error = %e, "resolution failed");
                ResolutionResult::failure(entity_type, slug, e)
            }
        }
    }

    pub fn clear_cache(&self, entity_type: Option<&str>) {
        self.cache.clear(entity_type);
    }

    async fn try_resolve(
        &self,
        entity_type: &str,
        slug: &str,
        rules: SlugRules,
    ) -> Result<(EntityRecord, bool), AppError> {
        if !self.settings.accepts_entity_type(entity_type) {
            return Err(AppError::configuration(
                format!("Unknown entity type '{}'", entity_type),
                json!({ "entity_type": entity_type, "known": self.settings.entity_types }),
            ));
        }

        if !rules.accepts(slug) {
            return Err(AppError::bad_request(
                "Invalid slug format",
                json!({ "slug": slug, "mode": rules.mode, "length": rules.length }),
            ));
        }

        if let Some(entity) = self.cache.get(entity_type, slug) {
            debug!(entity_type, slug, "resolution cache hit");
            return Ok((entity, true));
        }

        let entity = match self.settings.resolution.strategy {
            ResolutionStrategy::LookupTable => self.resolve_via_lookup(entity_type, slug).await?,
            ResolutionStrategy::Inline => self.resolve_inline(entity_type, slug).await?,
        };

        let entity = entity.ok_or_else(|| {
            AppError::not_found(
                "Slug not found",
                json!({ "entity_type": entity_type, "slug": slug }),
            )
        })?;

        self.cache.insert(entity_type, slug, entity.clone());
        Ok((entity, false))
    }

    async fn resolve_via_lookup(
        &self,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        let Some(link) = self.storage.resolve(entity_type, slug).await? else {
            return Ok(None);
        };

        let Some(mapping) = self.settings.resolution.mapping(entity_type) else {
            return Ok(Some(EntityRecord {
                entity_type: link.entity_type,
                entity_id: link.entity_id,
                slug: link.slug,
                data: Value::Null,
            }));
        };

        let entity = self
            .storage
            .fetch_entity(mapping, entity_type, &link.entity_id)
            .await?;

        Ok(entity.map(|entity| EntityRecord {
            slug: link.slug,
            ..entity
        }))
    }

    async fn resolve_inline(
        &self,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        let mapping = self.settings.resolution.mapping(entity_type).ok_or_else(|| {
            AppError::configuration(
                format!("No entity mapping configured for '{}'", entity_type),
                json!({ "entity_type": entity_type, "strategy": "inline" }),
            )
        })?;

        self.storage
            .fetch_entity_by_slug(mapping, entity_type, slug)
            .await
    }
}
