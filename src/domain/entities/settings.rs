//! Engine-wide defaults applied when a call leaves an option unset.

use crate::domain::entities::ResolutionSettings;
use crate::utils::code_generator::{DEFAULT_ID_LENGTH, SlugMode};
use std::collections::BTreeSet;

/// Defaults and registry shared by every generation and resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenerSettings {
    /// Domain the public URLs are built on.
    pub domain: String,
    pub id_length: usize,
    pub include_entity_type_in_path: bool,
    /// `true` selects random short codes, `false` readable entity slugs.
    pub shortening: bool,
    /// Known entity types. Empty means any non-empty type is accepted.
    pub entity_types: BTreeSet<String>,
    pub resolution: ResolutionSettings,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            id_length: DEFAULT_ID_LENGTH,
            include_entity_type_in_path: false,
            shortening: true,
            entity_types: BTreeSet::new(),
            resolution: ResolutionSettings::default(),
        }
    }
}

impl ShortenerSettings {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn with_id_length(mut self, id_length: usize) -> Self {
        self.id_length = id_length;
        self
    }

    pub fn with_entity_type_in_path(mut self, include: bool) -> Self {
        self.include_entity_type_in_path = include;
        self
    }

    pub fn with_shortening(mut self, shortening: bool) -> Self {
        self.shortening = shortening;
        self
    }

    pub fn with_entity_types<I, T>(mut self, entity_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.entity_types = entity_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resolution(mut self, resolution: ResolutionSettings) -> Self {
        self.resolution = resolution;
        self
    }

    /// Whether `entity_type` may be used with this engine.
    pub fn accepts_entity_type(&self, entity_type: &str) -> bool {
        !entity_type.trim().is_empty()
            && (self.entity_types.is_empty() || self.entity_types.contains(entity_type))
    }

    /// Slug rules matching the configured generation mode.
    pub fn slug_mode(&self) -> SlugMode {
        if self.shortening {
            SlugMode::Shortening
        } else {
            SlugMode::Framework
        }
    }
}
