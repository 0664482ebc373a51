//! Redis implementation of the storage adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::domain::entities::{EntityMapping, EntityRecord, LinkAnalytics, NewShortLink, ShortLink};
use crate::domain::repositories::StorageAdapter;
use crate::error::AppError;

/// The part of a link that never changes after creation.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLink {
    slug: String,
    entity_type: String,
    entity_id: String,
    public_id: String,
    url: String,
    target_url: Option<String>,
    created_at: DateTime<Utc>,
}

/// Redis storage for short links.
///
/// Key layout:
///
/// - `link:{entity_type}:{slug}` - link record as JSON, written with `SET NX`
/// - `link:{entity_type}:{slug}:clicks` - click counter (`INCR`)
/// - `link:{entity_type}:{slug}:last_clicked` - RFC 3339 timestamp
/// - `entity:{table}:{id}` - entity row as JSON
/// - `entity:{table}:slug:{slug}` - entity id for inline resolution
pub struct RedisStorage {
    conn: ConnectionManager,
}

impl RedisStorage {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the URL is invalid or the server
    /// cannot be reached.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");
        Ok(Self { conn: manager })
    }

    fn link_key(entity_type: &str, slug: &str) -> String {
        format!("link:{}:{}", entity_type, slug)
    }

    fn entity_key(table: &str, entity_id: &str) -> String {
        format!("entity:{}:{}", table, entity_id)
    }

    fn entity_slug_key(table: &str, slug: &str) -> String {
        format!("entity:{}:slug:{}", table, slug)
    }

    /// Stores an entity row so it can be resolved through `mapping`.
    ///
    /// The slug index is written when `data` carries the mapping's slug column.
    pub async fn put_entity(
        &self,
        mapping: &EntityMapping,
        entity_id: &str,
        data: &Value,
    ) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(
            Self::entity_key(&mapping.table, entity_id),
            serde_json::to_string(data)?,
        )
        .await?;

        if let Some(slug) = data.get(&mapping.slug_column).and_then(Value::as_str) {
            conn.set::<_, _, ()>(Self::entity_slug_key(&mapping.table, slug), entity_id)
                .await?;
        }

        Ok(())
    }

    async fn load_entity(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::entity_key(&mapping.table, entity_id)).await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let data: Value = serde_json::from_str(&raw)?;
        Ok(Some(EntityRecord {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            slug: data
                .get(&mapping.slug_column)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            data,
        }))
    }
}

#[async_trait]
impl StorageAdapter for RedisStorage {
    async fn initialize(&self) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await?;
        Ok(())
    }

    async fn save(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let key = Self::link_key(&new_link.entity_type, &new_link.slug);
        let created_at = Utc::now();

        let stored = StoredLink {
            slug: new_link.slug.clone(),
            entity_type: new_link.entity_type.clone(),
            entity_id: new_link.entity_id.clone(),
            public_id: new_link.public_id.clone(),
            url: new_link.url.clone(),
            target_url: new_link.target_url.clone(),
            created_at,
        };

        let mut conn = self.conn.clone();
        let inserted: bool = conn.set_nx(&key, serde_json::to_string(&stored)?).await?;

        if !inserted {
            return Err(AppError::conflict(
                "Slug already exists",
                json!({ "entity_type": new_link.entity_type, "slug": new_link.slug }),
            ));
        }

        debug!("Stored link {}", key);
        Ok(ShortLink::from_new(new_link, created_at))
    }

    async fn resolve(&self, entity_type: &str, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let key = Self::link_key(entity_type, slug);
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.get(&key).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let stored: StoredLink = serde_json::from_str(&raw)?;

        let clicks: Option<u64> = conn.get(format!("{key}:clicks")).await?;
        let last_clicked: Option<String> = conn.get(format!("{key}:last_clicked")).await?;
        let last_clicked_at = last_clicked
            .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Ok(Some(ShortLink {
            slug: stored.slug,
            entity_type: stored.entity_type,
            entity_id: stored.entity_id,
            public_id: stored.public_id,
            url: stored.url,
            target_url: stored.target_url,
            clicks: clicks.unwrap_or(0),
            created_at: stored.created_at,
            last_clicked_at,
        }))
    }

    async fn exists(&self, entity_type: &str, slug: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists(Self::link_key(entity_type, slug)).await?)
    }

    async fn increment_clicks(&self, entity_type: &str, slug: &str) -> Result<u64, AppError> {
        let key = Self::link_key(entity_type, slug);
        let mut conn = self.conn.clone();

        let exists: bool = conn.exists(&key).await?;
        if !exists {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "entity_type": entity_type, "slug": slug }),
            ));
        }

        let clicks: u64 = conn.incr(format!("{key}:clicks"), 1).await?;
        conn.set::<_, _, ()>(format!("{key}:last_clicked"), Utc::now().to_rfc3339())
            .await?;

        Ok(clicks)
    }

    async fn get_analytics(
        &self,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<LinkAnalytics>, AppError> {
        Ok(self
            .resolve(entity_type, slug)
            .await?
            .map(|link| link.analytics()))
    }

    async fn fetch_entity(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        self.load_entity(mapping, entity_type, entity_id).await
    }

    async fn fetch_entity_by_slug(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        let mut conn = self.conn.clone();
        let entity_id: Option<String> = conn
            .get(Self::entity_slug_key(&mapping.table, slug))
            .await?;

        match entity_id {
            Some(entity_id) => self.load_entity(mapping, entity_type, &entity_id).await,
            None => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
