//! Process-local storage adapter.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{EntityMapping, EntityRecord, LinkAnalytics, NewShortLink, ShortLink};
use crate::domain::repositories::StorageAdapter;
use crate::error::AppError;

type LinkKey = (String, String);

/// In-memory implementation of [`StorageAdapter`].
///
/// Entity "tables" are maps of id to JSON document and can be seeded with
/// [`InMemoryStorage::insert_entity`]. Data is lost when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    links: RwLock<HashMap<LinkKey, ShortLink>>,
    entities: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entity document in `table` under `entity_id`, replacing any previous one.
    pub async fn insert_entity(&self, table: &str, entity_id: &str, data: Value) {
        let mut entities = self.entities.write().await;
        entities
            .entry(table.to_string())
            .or_default()
            .insert(entity_id.to_string(), data);
    }

    /// Number of stored bindings.
    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }

    fn key(entity_type: &str, slug: &str) -> LinkKey {
        (entity_type.to_string(), slug.to_string())
    }

    fn entity_record(
        mapping: &EntityMapping,
        entity_type: &str,
        entity_id: &str,
        data: &Value,
    ) -> EntityRecord {
        let slug = data
            .get(&mapping.slug_column)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        EntityRecord {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            slug,
            data: data.clone(),
        }
    }
}

#[async_trait]
impl StorageAdapter for InMemoryStorage {
    async fn initialize(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn save(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let key = Self::key(&new_link.entity_type, &new_link.slug);
        let mut links = self.links.write().await;

        if links.contains_key(&key) {
            return Err(AppError::conflict(
                "Slug already exists for this entity type",
                json!({ "entity_type": new_link.entity_type, "slug": new_link.slug }),
            ));
        }

        let link = ShortLink::from_new(new_link, Utc::now());
        links.insert(key, link.clone());
        debug!(entity_type = %link.entity_type, slug = %link.slug, "link stored in memory");

        Ok(link)
    }

    async fn resolve(&self, entity_type: &str, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let links = self.links.read().await;
        Ok(links.get(&Self::key(entity_type, slug)).cloned())
    }

    async fn exists(&self, entity_type: &str, slug: &str) -> Result<bool, AppError> {
        let links = self.links.read().await;
        Ok(links.contains_key(&Self::key(entity_type, slug)))
    }

    async fn increment_clicks(&self, entity_type: &str, slug: &str) -> Result<u64, AppError> {
        let mut links = self.links.write().await;
        let link = links.get_mut(&Self::key(entity_type, slug)).ok_or_else(|| {
            AppError::not_found(
                "Short link not found",
                json!({ "entity_type": entity_type, "slug": slug }),
            )
        })?;

        link.clicks += 1;
        link.last_clicked_at = Some(Utc::now());
        Ok(link.clicks)
    }

    async fn get_analytics(
        &self,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<LinkAnalytics>, AppError> {
        let links = self.links.read().await;
        Ok(links
            .get(&Self::key(entity_type, slug))
            .map(ShortLink::analytics))
    }

    async fn fetch_entity(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        let entities = self.entities.read().await;
        Ok(entities
            .get(&mapping.table)
            .and_then(|table| table.get(entity_id))
            .map(|data| Self::entity_record(mapping, entity_type, entity_id, data)))
    }

    async fn fetch_entity_by_slug(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        let entities = self.entities.read().await;
        let Some(table) = entities.get(&mapping.table) else {
            return Ok(None);
        };

        Ok(table
            .iter()
            .find(|(_, data)| {
                data.get(&mapping.slug_column).and_then(Value::as_str) == Some(slug)
            })
            .map(|(id, data)| Self::entity_record(mapping, entity_type, id, data)))
    }

    async fn close(&self) -> Result<(), AppError> {
        Ok(())
    }
}
