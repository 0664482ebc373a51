//! Resolved entities and how to find them in storage.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// An entity found by resolving a slug.
///
/// `data` holds the entity's own row when the backing store can provide it,
/// and `Value::Null` when only the lookup record is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity_type: String,
    pub entity_id: String,
    pub slug: String,
    pub data: Value,
}

/// Where an entity type lives in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub table: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_slug_column")]
    pub slug_column: String,
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_slug_column() -> String {
    "slug".to_string()
}

impl EntityMapping {
    /// Mapping with the conventional `id` and `slug` columns.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            id_column: default_id_column(),
            slug_column: default_slug_column(),
        }
    }

    pub fn with_columns(mut self, id_column: impl Into<String>, slug_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self.slug_column = slug_column.into();
        self
    }
}

/// How a slug is turned back into an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The shared lookup table yields the entity id; the entity is then read
    /// from its own table when a mapping exists.
    #[default]
    LookupTable,
    /// The slug is a column of the entity's own table. Requires a mapping.
    Inline,
}

/// Resolution configuration: strategy plus per-entity-type mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSettings {
    pub strategy: ResolutionStrategy,
    pub mappings: HashMap<String, EntityMapping>,
}

impl ResolutionSettings {
    pub fn new(strategy: ResolutionStrategy) -> Self {
        Self {
            strategy,
            mappings: HashMap::new(),
        }
    }

    pub fn with_mapping(mut self, entity_type: impl Into<String>, mapping: EntityMapping) -> Self {
        self.mappings.insert(entity_type.into(), mapping);
        self
    }

    pub fn mapping(&self, entity_type: &str) -> Option<&EntityMapping> {
        self.mappings.get(entity_type)
    }
}
