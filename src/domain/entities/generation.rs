//! Generation options, the per-call request derived from them, and results.

use crate::domain::entities::{NewShortLink, ShortenerSettings};
use crate::error::{AppError, ErrorInfo};
use crate::utils::pattern::UrlPattern;
use crate::utils::url_normalizer::normalize_target_url;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::skip_serializing_none;
use validator::{Validate, ValidationError};

/// Caller-facing generation options.
///
/// Every field is optional; unset fields fall back to [`ShortenerSettings`].
/// Older option names are accepted as serde aliases and land in one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenerateOptions {
    #[serde(alias = "idLength", alias = "length")]
    #[validate(range(min = 1, max = 64))]
    pub id_length: Option<usize>,

    #[validate(length(min = 1, max = 253))]
    pub domain: Option<String>,

    #[serde(alias = "includeEntityTypeInPath")]
    pub include_entity_type_in_path: Option<bool>,

    /// Per-call override of random shortening versus readable slugs.
    pub shortening: Option<bool>,

    #[serde(alias = "url_pattern", alias = "urlPattern")]
    #[validate(length(min = 1, max = 200))]
    pub pattern: Option<String>,

    #[serde(alias = "publicId", alias = "custom_id", alias = "customId")]
    #[validate(length(min = 1, max = 100), custom(function = "validate_public_id"))]
    pub public_id: Option<String>,

    /// Whether the public id must literally appear in the slug. Defaults to `true`.
    #[serde(alias = "includeInSlug")]
    pub include_in_slug: Option<bool>,

    #[serde(alias = "targetUrl", alias = "url")]
    pub target_url: Option<String>,
}

fn validate_public_id(public_id: &str) -> Result<(), ValidationError> {
    if public_id
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
    {
        return Err(ValidationError::new("public_id_not_url_safe"));
    }
    Ok(())
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_length(mut self, id_length: usize) -> Self {
        self.id_length = Some(id_length);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn include_entity_type_in_path(mut self, include: bool) -> Self {
        self.include_entity_type_in_path = Some(include);
        self
    }

    pub fn shortening(mut self, shortening: bool) -> Self {
        self.shortening = Some(shortening);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    pub fn include_in_slug(mut self, include: bool) -> Self {
        self.include_in_slug = Some(include);
        self
    }

    pub fn target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = Some(target_url.into());
        self
    }
}

/// Strategy used to produce a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Random short codes ("shortening mode").
    Random,
    /// Readable slugs derived from the entity id ("framework mode").
    EntityDerived,
    /// A public id placed into a fixed template.
    Pattern,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Random => "random",
            GenerationMode::EntityDerived => "entity_derived",
            GenerationMode::Pattern => "pattern",
        }
    }
}

/// A fully resolved generation call: options merged with settings and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub entity_type: String,
    pub entity_id: String,
    pub mode: GenerationMode,
    pub id_length: usize,
    pub domain: String,
    pub include_entity_type_in_path: bool,
    pub pattern: Option<UrlPattern>,
    pub public_id: Option<String>,
    pub include_in_slug: bool,
    pub target_url: Option<String>,
}

impl GenerationRequest {
    /// Builds the request for one call.
    ///
    /// # Errors
    ///
    /// - [`AppError::Configuration`] for an entity type the settings do not know
    /// - [`AppError::Validation`] for invalid options or destination URL
    /// - [`AppError::PatternMalformed`] for a template without exactly one
    ///   supported placeholder
    pub fn resolve(
        entity_type: &str,
        entity_id: &str,
        options: GenerateOptions,
        settings: &ShortenerSettings,
    ) -> Result<Self, AppError> {
        if !settings.accepts_entity_type(entity_type) {
            return Err(AppError::configuration(
                format!("Unknown entity type '{}'", entity_type),
                json!({ "entity_type": entity_type, "known": settings.entity_types }),
            ));
        }

        options.validate()?;

        let pattern = options
            .pattern
            .as_deref()
            .map(UrlPattern::parse)
            .transpose()?;

        let target_url = options
            .target_url
            .as_deref()
            .map(normalize_target_url)
            .transpose()
            .map_err(|e| {
                AppError::bad_request("Invalid target URL", json!({ "reason": e.to_string() }))
            })?;

        let shortening = options.shortening.unwrap_or(settings.shortening);
        let mode = match (&pattern, shortening) {
            (Some(_), _) => GenerationMode::Pattern,
            (None, true) => GenerationMode::Random,
            (None, false) => GenerationMode::EntityDerived,
        };

        if mode == GenerationMode::EntityDerived && entity_id.trim().is_empty() {
            return Err(AppError::bad_request(
                "Entity id is required to derive a slug",
                json!({ "entity_type": entity_type }),
            ));
        }

        Ok(Self {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            mode,
            id_length: options.id_length.unwrap_or(settings.id_length),
            domain: options.domain.unwrap_or_else(|| settings.domain.clone()),
            include_entity_type_in_path: options
                .include_entity_type_in_path
                .unwrap_or(settings.include_entity_type_in_path),
            pattern,
            public_id: options.public_id,
            include_in_slug: options.include_in_slug.unwrap_or(true),
            target_url,
        })
    }
}

/// Outcome of a successful generation, before it is folded into a result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSlug {
    pub slug: String,
    pub url: String,
    pub public_id: String,
    pub mode: GenerationMode,
    /// Set when the existence check was unavailable and no collision
    /// protection was applied to `slug`.
    pub collision_check_skipped: bool,
    pub target_url: Option<String>,
}

/// Result of a generation call. Callers branch on `success`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub success: bool,
    /// Empty on failure.
    pub slug: String,
    pub url: Option<String>,
    pub public_id: Option<String>,
    pub entity_type: String,
    pub entity_id: String,
    pub mode: Option<GenerationMode>,
    pub collision_check_skipped: bool,
    pub target_url: Option<String>,
    pub error: Option<ErrorInfo>,
}

impl GenerationResult {
    pub fn from_outcome(
        entity_type: &str,
        entity_id: &str,
        outcome: Result<GeneratedSlug, AppError>,
    ) -> Self {
        match outcome {
            Ok(generated) => Self {
                success: true,
                slug: generated.slug,
                url: Some(generated.url),
                public_id: Some(generated.public_id),
                entity_type: entity_type.to_string(),
                entity_id: entity_id.to_string(),
                mode: Some(generated.mode),
                collision_check_skipped: generated.collision_check_skipped,
                target_url: generated.target_url,
                error: None,
            },
            Err(error) => Self::failure(entity_type, entity_id, error),
        }
    }

    pub fn failure(entity_type: &str, entity_id: &str, error: AppError) -> Self {
        Self {
            success: false,
            slug: String::new(),
            url: None,
            public_id: None,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            mode: None,
            collision_check_skipped: false,
            target_url: None,
            error: Some(error.to_info()),
        }
    }

    /// Error code of a failed result.
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Record to persist for a successful result.
    pub fn to_new_link(&self) -> Option<NewShortLink> {
        if !self.success {
            return None;
        }

        Some(NewShortLink {
            slug: self.slug.clone(),
            entity_type: self.entity_type.clone(),
            entity_id: self.entity_id.clone(),
            public_id: self.public_id.clone().unwrap_or_else(|| self.slug.clone()),
            url: self.url.clone().unwrap_or_default(),
            target_url: self.target_url.clone(),
        })
    }
}
