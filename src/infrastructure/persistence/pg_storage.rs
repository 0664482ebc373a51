//! PostgreSQL implementation of the storage adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::LazyLock;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

use crate::domain::entities::{EntityMapping, EntityRecord, LinkAnalytics, NewShortLink, ShortLink};
use crate::domain::repositories::StorageAdapter;
use crate::error::AppError;

/// Connection attempts made by [`PgStorage::connect`] after the first one fails.
const CONNECT_RETRIES: usize = 4;

static SQL_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("static regex is valid"));

const LINK_COLUMNS: &str =
    "slug, entity_type, entity_id, public_id, url, target_url, clicks, created_at, last_clicked_at";

#[derive(Debug, sqlx::FromRow)]
struct ShortLinkRow {
    slug: String,
    entity_type: String,
    entity_id: String,
    public_id: String,
    url: String,
    target_url: Option<String>,
    clicks: i64,
    created_at: DateTime<Utc>,
    last_clicked_at: Option<DateTime<Utc>>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink {
            slug: row.slug,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            public_id: row.public_id,
            url: row.url,
            target_url: row.target_url,
            clicks: row.clicks.max(0) as u64,
            created_at: row.created_at,
            last_clicked_at: row.last_clicked_at,
        }
    }
}

/// Connection pool settings for [`PgStorage::connect`].
#[derive(Debug, Clone)]
pub struct PgStorageOptions {
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for PgStorageOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// PostgreSQL storage for short links.
///
/// Bindings live in the `short_links` lookup table created by the embedded
/// migrations. Entity tables named in an [`EntityMapping`] are read as JSON
/// rows; their table and column names are checked as plain SQL identifiers
/// before being interpolated into queries.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] once every attempt has failed.
    pub async fn connect(database_url: &str, options: PgStorageOptions) -> Result<Self, AppError> {
        let strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(CONNECT_RETRIES);

        let PgStorageOptions {
            max_connections,
            connect_timeout,
        } = options;

        let pool = Retry::start(strategy, move || async move {
            PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(connect_timeout)
                .connect(database_url)
                .await
                .inspect_err(|e| warn!("PostgreSQL connection attempt failed: {}", e))
        })
        .await
        .map_err(|e| {
            AppError::unavailable(
                "Failed to connect to PostgreSQL",
                json!({ "reason": e.to_string() }),
            )
        })?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn select_entity(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        column: &str,
        value: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        let table = quote_table(&mapping.table)?;
        let column = quote_identifier(column)?;

        let query = format!(
            "SELECT to_jsonb(t) AS data FROM {table} t WHERE t.{column}::text = $1 LIMIT 1"
        );
        let data: Option<Value> = sqlx::query_scalar(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(data.map(|data| EntityRecord {
            entity_type: entity_type.to_string(),
            entity_id: json_text(data.get(&mapping.id_column)),
            slug: json_text(data.get(&mapping.slug_column)),
            data,
        }))
    }
}

/// Text form of a JSON scalar; strings are unquoted.
fn json_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn quote_identifier(identifier: &str) -> Result<String, AppError> {
    if !SQL_IDENTIFIER.is_match(identifier) {
        return Err(AppError::configuration(
            "Invalid SQL identifier in entity mapping",
            json!({ "identifier": identifier }),
        ));
    }
    Ok(format!("\"{identifier}\""))
}

/// Quotes `table` or `schema.table`.
fn quote_table(table: &str) -> Result<String, AppError> {
    let parts = table
        .split('.')
        .map(quote_identifier)
        .collect::<Result<Vec<_>, _>>()?;

    if parts.len() > 2 {
        return Err(AppError::configuration(
            "Table name may have at most one schema qualifier",
            json!({ "table": table }),
        ));
    }

    Ok(parts.join("."))
}

#[async_trait]
impl StorageAdapter for PgStorage {
    async fn initialize(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::internal("Migration failed", json!({ "reason": e.to_string() })))?;

        info!("Database migrations applied");
        Ok(())
    }

    async fn save(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let query = format!(
            "INSERT INTO short_links (slug, entity_type, entity_id, public_id, url, target_url) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {LINK_COLUMNS}"
        );

        let row: ShortLinkRow = sqlx::query_as(&query)
            .bind(&new_link.slug)
            .bind(&new_link.entity_type)
            .bind(&new_link.entity_id)
            .bind(&new_link.public_id)
            .bind(&new_link.url)
            .bind(&new_link.target_url)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn resolve(&self, entity_type: &str, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM short_links WHERE entity_type = $1 AND slug = $2"
        );

        let row: Option<ShortLinkRow> = sqlx::query_as(&query)
            .bind(entity_type)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn exists(&self, entity_type: &str, slug: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM short_links WHERE entity_type = $1 AND slug = $2)",
        )
        .bind(entity_type)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn increment_clicks(&self, entity_type: &str, slug: &str) -> Result<u64, AppError> {
        let clicks: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE short_links
            SET clicks = clicks + 1, last_clicked_at = NOW()
            WHERE entity_type = $1 AND slug = $2
            RETURNING clicks
            "#,
        )
        .bind(entity_type)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        clicks.map(|c| c.max(0) as u64).ok_or_else(|| {
            AppError::not_found(
                "Short link not found",
                json!({ "entity_type": entity_type, "slug": slug }),
            )
        })
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
        self.select_entity(mapping, entity_type, &mapping.id_column, entity_id)
            .await
    }

    async fn fetch_entity_by_slug(
        &self,
        mapping: &EntityMapping,
        entity_type: &str,
        slug: &str,
    ) -> Result<Option<EntityRecord>, AppError> {
        self.select_entity(mapping, entity_type, &mapping.slug_column, slug)
            .await
    }

    async fn close(&self) -> Result<(), AppError> {
        self.pool.close().await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn save_batch(&self, new_links: Vec<NewShortLink>) -> Result<Vec<ShortLink>, AppError> {
        let query = format!(
            "INSERT INTO short_links (slug, entity_type, entity_id, public_id, url, target_url) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {LINK_COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(new_links.len());

        for new_link in new_links {
            let row: ShortLinkRow = sqlx::query_as(&query)
                .bind(&new_link.slug)
                .bind(&new_link.entity_type)
                .bind(&new_link.entity_id)
                .bind(&new_link.public_id)
                .bind(&new_link.url)
                .bind(&new_link.target_url)
                .fetch_one(&mut *tx)
                .await?;
            saved.push(row.into());
        }

        tx.commit().await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("products").unwrap(), "\"products\"");
        assert_eq!(quote_identifier("_slug_2").unwrap(), "\"_slug_2\"");
        assert!(quote_identifier("products; DROP TABLE x").is_err());
        assert!(quote_identifier("1abc").is_err());
        assert!(quote_identifier("").is_err());
        assert!(quote_identifier("we\"ird").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_gives_up_as_unavailable() {
        let result = PgStorage::connect("not-a-database-url", PgStorageOptions::default()).await;

        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    #[test]
    fn test_quote_table_with_schema() {
        assert_eq!(quote_table("shop.products").unwrap(), "\"shop\".\"products\"");
        assert!(quote_table("a.b.c").is_err());
        assert!(quote_table("shop.").is_err());
    }

    #[test]
    fn test_json_text() {
        assert_eq!(json_text(Some(&json!("lamp"))), "lamp");
        assert_eq!(json_text(Some(&json!(42))), "42");
        assert_eq!(json_text(Some(&Value::Null)), "");
        assert_eq!(json_text(None), "");
    }
}
