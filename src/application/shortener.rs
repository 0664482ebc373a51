//! Public entry point of the library.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::services::{ResolutionService, SlugRules, SlugService};
use crate::domain::entities::{
    BatchItem, GenerateOptions, GenerationResult, LinkAnalytics, ResolutionResult,
    ShortenerSettings,
};
use crate::domain::repositories::StorageAdapter;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheStats, CollisionCache, ResolutionCache};
use crate::infrastructure::persistence::StorageExistenceCheck;
use crate::utils::code_generator::{SlugMode, is_valid_slug};

/// Slug generation, persistence and resolution over one storage backend.
///
/// Each instance owns its collision and resolution caches; two instances
/// never share cached state.
///
/// # Examples
///
/// ```ignore
/// let storage = Arc::new(InMemoryStorage::new());
/// let shortener = EntityShortener::new(storage, ShortenerSettings::new("yourdomain.co"));
///
/// let created = shortener.create("product", "42", GenerateOptions::new()).await;
/// assert!(created.success);
///
/// let resolved = shortener.resolve("product", &created.slug).await;
/// assert_eq!(resolved.entity.unwrap().entity_id, "42");
/// ```
pub struct EntityShortener<S: StorageAdapter> {
    storage: Arc<S>,
    slugs: SlugService<StorageExistenceCheck<S>>,
    resolver: ResolutionService<S>,
    settings: Arc<ShortenerSettings>,
}

impl<S: StorageAdapter> EntityShortener<S> {
    pub fn new(storage: Arc<S>, settings: ShortenerSettings) -> Self {
        let settings = Arc::new(settings);
        let existence_check = Arc::new(StorageExistenceCheck::new(storage.clone()));

        Self {
            slugs: SlugService::new(
                existence_check,
                Arc::new(CollisionCache::new()),
                settings.clone(),
            ),
            resolver: ResolutionService::new(
                storage.clone(),
                Arc::new(ResolutionCache::new()),
                settings.clone(),
            ),
            storage,
            settings,
        }
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Prepares the storage backend.
    pub async fn initialize(&self) -> Result<(), AppError> {
        self.storage.initialize().await
    }

    /// Generates a slug without persisting it.
    pub async fn generate(
        &self,
        entity_type: &str,
        entity_id: &str,
        options: GenerateOptions,
    ) -> GenerationResult {
        self.slugs.generate(entity_type, entity_id, options).await
    }

    /// Generates a slug and saves the binding.
    ///
    /// A save rejected by storage (for example a slug taken between check
    /// and insert) turns the result into a failure.
    pub async fn create(
        &self,
        entity_type: &str,
        entity_id: &str,
        options: GenerateOptions,
    ) -> GenerationResult {
        let result = self.generate(entity_type, entity_id, options).await;

        let Some(new_link) = result.to_new_link() else {
            return result;
        };

        match self.storage.save(new_link).await {
            Ok(link) => {
                self.slugs.checker().remember(&link.entity_type, &link.slug);
                info!(
                    entity_type = %link.entity_type,
                    entity_id = %link.entity_id,
                    slug = %link.slug,
                    "short link created"
                );
                result
            }
            Err(e) => {
                warn!(entity_type, entity_id, slug = %result.slug, error = %e, "failed to save short link");
                GenerationResult::failure(entity_type, entity_id, e)
            }
        }
    }

    /// Creates every item in order. One failure does not stop the batch.
    pub async fn create_batch(&self, items: Vec<BatchItem>) -> Vec<GenerationResult> {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(
                self.create(&item.entity_type, &item.entity_id, item.options)
                    .await,
            );
        }
        results
    }

    pub async fn resolve(&self, entity_type: &str, slug: &str) -> ResolutionResult {
        self.resolver.resolve(entity_type, slug).await
    }

    /// Resolves with explicit format rules, e.g. for pattern slugs that do
    /// not follow the configured mode.
    pub async fn resolve_with_rules(
        &self,
        entity_type: &str,
        slug: &str,
        rules: SlugRules,
    ) -> ResolutionResult {
        self.resolver.resolve_with_rules(entity_type, slug, rules).await
    }

    /// Counts one click and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown slugs.
    pub async fn track_click(&self, entity_type: &str, slug: &str) -> Result<u64, AppError> {
        self.storage.increment_clicks(entity_type, slug).await
    }

    pub async fn analytics(
        &self,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<LinkAnalytics>, AppError> {
        self.storage.get_analytics(entity_type, slug).await
    }

    /// Checks `slug` against the configured rules, or the given overrides.
    pub fn validate_slug(&self, slug: &str, length: Option<usize>, mode: Option<SlugMode>) -> bool {
        is_valid_slug(
            slug,
            length.unwrap_or(self.settings.id_length),
            mode.unwrap_or_else(|| self.settings.slug_mode()),
        )
    }

    pub fn clear_collision_cache(&self, entity_type: Option<&str>) {
        self.slugs.checker().clear(entity_type);
    }

    pub fn clear_resolution_cache(&self, entity_type: Option<&str>) {
        self.resolver.clear_cache(entity_type);
    }

    pub fn collision_cache_stats(&self) -> CacheStats {
        self.slugs.checker().stats()
    }

    pub async fn health_check(&self) -> bool {
        self.storage.health_check().await
    }

    pub async fn close(&self) -> Result<(), AppError> {
        self.storage.close().await
    }
}
