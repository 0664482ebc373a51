//! Slug generation engine.
//!
//! Three strategies are available, selected per call by
//! [`GenerationRequest::resolve`]:
//!
//! - **Random**: fresh short codes, retried on collision.
//! - **Entity derived**: a readable slug derived from the entity id. A
//!   collision fails the call at once, since a different slug would change the
//!   public identity of the entity.
//! - **Pattern**: a public id placed into a fixed template, retried on
//!   collision of the full substituted slug. When the public id is kept out
//!   of the slug there is only one possible slug, so a collision is a conflict.
//!
//! When the existence check is unavailable, generation still succeeds with the
//! current candidate and flags the result with `collision_check_skipped`.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::CollisionChecker;
use crate::domain::entities::{
    GenerateOptions, GeneratedSlug, GenerationMode, GenerationRequest, GenerationResult,
    ShortenerSettings,
};
use crate::domain::repositories::{CheckOutcome, ExistenceCheck};
use crate::error::AppError;
use crate::infrastructure::cache::CollisionCache;
use crate::utils::code_generator::{SlugMode, generate_code, is_valid_slug};
use crate::utils::slug::derive_slug;
use crate::utils::url_builder::build_public_url;

/// Candidate budget of the retry loop, counting the first candidate.
///
/// The last candidate is drawn but never checked: a backend that always
/// reports a collision sees `MAX_ATTEMPTS - 1` checks.
pub const MAX_ATTEMPTS: u32 = 5;

struct Candidate {
    slug: String,
    public_id: String,
}

/// Generates unique slugs for entities.
pub struct SlugService<E: ExistenceCheck> {
    checker: CollisionChecker<E>,
    settings: Arc<ShortenerSettings>,
}

impl<E: ExistenceCheck> SlugService<E> {
    pub fn new(
        existence_check: Arc<E>,
        cache: Arc<CollisionCache>,
        settings: Arc<ShortenerSettings>,
    ) -> Self {
        Self {
            checker: CollisionChecker::new(existence_check, cache),
            settings,
        }
    }

    pub fn checker(&self) -> &CollisionChecker<E> {
        &self.checker
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// Generates a slug for an entity. Never fails: errors are reported in
    /// the returned [`GenerationResult`].
    pub async fn generate(
        &self,
        entity_type: &str,
        entity_id: &str,
        options: GenerateOptions,
    ) -> GenerationResult {
        let (strategy, outcome) =
            match GenerationRequest::resolve(entity_type, entity_id, options, &self.settings) {
                Ok(request) => (request.mode.as_str(), self.generate_slug(&request).await),
                Err(e) => ("none", Err(e)),
            };

        let label = match &outcome {
            Ok(generated) if generated.collision_check_skipped => "degraded",
            Ok(_) => "success",
            Err(e) => e.code(),
        };
        metrics::counter!("slug_generation_total", "strategy" => strategy, "outcome" => label)
            .increment(1);

        match &outcome {
            Ok(generated) => debug!(
                entity_type,
                entity_id,
                slug = %generated.slug,
                strategy,
                "slug generated"
            ),
            Err(e) => warn!(entity_type, entity_id, error = %e, strategy, "slug generation failed"),
        }

        GenerationResult::from_outcome(entity_type, entity_id, outcome)
    }

    /// Runs the strategy selected by `request`.
    ///
    /// # Errors
    ///
    /// - [`AppError::RetryExhausted`] when every candidate collided
    /// - [`AppError::Conflict`] when an entity-derived slug is taken
    /// - [`AppError::Validation`] when an entity-derived slug is unusable
    /// - [`AppError::PatternMalformed`] when the template has nothing left
    ///   besides its placeholder
    pub async fn generate_slug(&self, request: &GenerationRequest) -> Result<GeneratedSlug, AppError> {
        match request.mode {
            GenerationMode::Random => self.generate_random(request).await,
            GenerationMode::EntityDerived => self.generate_entity_derived(request).await,
            GenerationMode::Pattern => self.generate_from_pattern(request).await,
        }
    }

    async fn generate_random(&self, request: &GenerationRequest) -> Result<GeneratedSlug, AppError> {
        if let Some(public_id) = &request.public_id {
            return Ok(Self::finish(request, public_id.clone(), public_id.clone(), false));
        }

        let id_length = request.id_length;
        let (candidate, skipped) = self
            .first_free_candidate(&request.entity_type, || {
                let code = generate_code(id_length);
                Candidate {
                    slug: code.clone(),
                    public_id: code,
                }
            })
            .await?;

        Ok(Self::finish(request, candidate.slug, candidate.public_id, skipped))
    }

    async fn generate_entity_derived(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedSlug, AppError> {
        let public_id = match &request.public_id {
            Some(public_id) => public_id.clone(),
            None => derive_slug(&request.entity_id),
        };

        if public_id.is_empty() {
            return Err(AppError::bad_request(
                "Entity id has no characters usable in a slug",
                json!({ "entity_id": request.entity_id }),
            ));
        }

        let slug = if request.include_in_slug {
            if !is_valid_slug(&public_id, request.id_length, SlugMode::Framework) {
                return Err(AppError::bad_request(
                    "Public id is not a valid readable slug",
                    json!({ "public_id": public_id }),
                ));
            }
            public_id.clone()
        } else {
            generate_code(request.id_length)
        };

        // Caller-supplied public ids are taken as already vetted.
        let skipped = match request.public_id {
            Some(_) => false,
            None => self.check_single(&request.entity_type, &slug).await?,
        };

        Ok(Self::finish(request, slug, public_id, skipped))
    }

    async fn generate_from_pattern(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedSlug, AppError> {
        let pattern = request.pattern.as_ref().ok_or_else(|| {
            AppError::internal("Pattern strategy selected without a pattern", json!({}))
        })?;

        if let Some(public_id) = &request.public_id
            && request.include_in_slug
        {
            let slug = pattern.substitute(public_id);
            return Ok(Self::finish(request, slug, public_id.clone(), false));
        }

        let id_length = request.id_length;

        // The slug does not vary with the public id: one check decides.
        if !request.include_in_slug {
            let slug = pattern.without_placeholder()?;
            let public_id = request
                .public_id
                .clone()
                .unwrap_or_else(|| generate_code(id_length));
            let skipped = self.check_single(&request.entity_type, &slug).await?;
            return Ok(Self::finish(request, slug, public_id, skipped));
        }

        let (candidate, skipped) = self
            .first_free_candidate(&request.entity_type, || {
                let public_id = generate_code(id_length);
                Candidate {
                    slug: pattern.substitute(&public_id),
                    public_id,
                }
            })
            .await?;

        Ok(Self::finish(request, candidate.slug, candidate.public_id, skipped))
    }

    /// Checks a slug that has no alternative candidate.
    ///
    /// Returns whether collision checking was skipped.
    async fn check_single(&self, entity_type: &str, slug: &str) -> Result<bool, AppError> {
        match self.checker.exists(entity_type, slug).await {
            CheckOutcome::Absent => Ok(false),
            CheckOutcome::Exists => Err(AppError::conflict(
                format!(
                    "Slug '{}' already exists for entity type '{}'",
                    slug, entity_type
                ),
                json!({ "entity_type": entity_type, "slug": slug }),
            )),
            CheckOutcome::Unavailable(reason) => {
                warn!(
                    entity_type,
                    slug,
                    reason = %reason,
                    "existence check unavailable, continuing without collision protection"
                );
                Ok(true)
            }
        }
    }

    /// Bounded retry loop shared by the random and pattern strategies.
    ///
    /// Returns the winning candidate and whether collision checking was
    /// skipped because the backing check was unavailable.
    async fn first_free_candidate<F>(
        &self,
        entity_type: &str,
        mut next: F,
    ) -> Result<(Candidate, bool), AppError>
    where
        F: FnMut() -> Candidate,
    {
        let mut candidate = next();
        let mut attempt = 1;

        loop {
            match self.checker.exists(entity_type, &candidate.slug).await {
                CheckOutcome::Absent => return Ok((candidate, false)),
                CheckOutcome::Unavailable(reason) => {
                    warn!(
                        entity_type,
                        slug = %candidate.slug,
                        attempt,
                        reason = %reason,
                        "existence check unavailable, continuing without collision protection"
                    );
                    return Ok((candidate, true));
                }
                CheckOutcome::Exists => {
                    attempt += 1;
                    info!(
                        entity_type,
                        slug = %candidate.slug,
                        attempt,
                        "slug taken, trying another candidate"
                    );
                    candidate = next();

                    if attempt >= MAX_ATTEMPTS {
                        return Err(AppError::retry_exhausted(
                            format!(
                                "Could not generate a unique id after {} attempts",
                                MAX_ATTEMPTS
                            ),
                            json!({ "entity_type": entity_type, "attempts": MAX_ATTEMPTS }),
                        ));
                    }
                }
            }
        }
    }

    fn finish(
        request: &GenerationRequest,
        slug: String,
        public_id: String,
        collision_check_skipped: bool,
    ) -> GeneratedSlug {
        let url = build_public_url(
            &request.domain,
            &request.entity_type,
            &slug,
            request.include_entity_type_in_path,
        );

        GeneratedSlug {
            slug,
            url,
            public_id,
            mode: request.mode,
            collision_check_skipped,
            target_url: request.target_url.clone(),
        }
    }
}
