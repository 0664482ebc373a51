//! Memo of successful slug resolutions, partitioned by entity type.

use crate::domain::entities::EntityRecord;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Resolved entities keyed by entity type, then slug.
///
/// Bindings are append-only by convention, so entries never expire; they
/// leave the cache only through [`ResolutionCache::clear`].
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<String, HashMap<String, EntityRecord>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity_type: &str, slug: &str) -> Option<EntityRecord> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(entity_type)
            .and_then(|partition| partition.get(slug))
            .cloned()
    }

    pub fn insert(&self, entity_type: &str, slug: &str, entity: EntityRecord) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(entity_type.to_string())
            .or_default()
            .insert(slug.to_string(), entity);
    }

    pub fn clear(&self, entity_type: Option<&str>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entity_type {
            Some(entity_type) => {
                entries.remove(entity_type);
            }
            None => entries.clear(),
        }
        debug!(entity_type = ?entity_type, "resolution cache cleared");
    }

    /// Total number of cached resolutions.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
