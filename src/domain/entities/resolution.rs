//! Result of resolving a slug back to its entity.

use crate::domain::entities::EntityRecord;
use crate::error::{AppError, ErrorInfo};
use serde::Serialize;
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub success: bool,
    pub entity_type: String,
    pub slug: String,
    pub entity: Option<EntityRecord>,
    /// `true` when the entity came from the in-process resolution cache.
    pub from_cache: bool,
    pub error: Option<ErrorInfo>,
}

impl ResolutionResult {
    pub fn found(entity: EntityRecord, from_cache: bool) -> Self {
        Self {
            success: true,
            entity_type: entity.entity_type.clone(),
            slug: entity.slug.clone(),
            entity: Some(entity),
            from_cache,
            error: None,
        }
    }

    pub fn failure(entity_type: &str, slug: &str, error: AppError) -> Self {
        Self {
            success: false,
            entity_type: entity_type.to_string(),
            slug: slug.to_string(),
            entity: None,
            from_cache: false,
            error: Some(error.to_info()),
        }
    }

    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| e.code)
    }
}
