//! Persisted short link records and their analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored binding between a slug and an entity.
///
/// One row of the lookup table: the slug is unique per entity type, and the
/// record carries everything needed to rebuild the public URL and to find the
/// entity again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortLink {
    pub slug: String,
    pub entity_type: String,
    pub entity_id: String,
    pub public_id: String,
    pub url: String,
    pub target_url: Option<String>,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl ShortLink {
    /// Materializes a new record as it looks right after insertion.
    pub fn from_new(new_link: NewShortLink, created_at: DateTime<Utc>) -> Self {
        Self {
            slug: new_link.slug,
            entity_type: new_link.entity_type,
            entity_id: new_link.entity_id,
            public_id: new_link.public_id,
            url: new_link.url,
            target_url: new_link.target_url,
            clicks: 0,
            created_at,
            last_clicked_at: None,
        }
    }

    /// Click statistics view of this record.
    pub fn analytics(&self) -> LinkAnalytics {
        LinkAnalytics {
            slug: self.slug.clone(),
            entity_type: self.entity_type.clone(),
            entity_id: self.entity_id.clone(),
            clicks: self.clicks,
            created_at: self.created_at,
            last_clicked_at: self.last_clicked_at,
        }
    }
}

/// Input data for persisting a freshly generated slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShortLink {
    pub slug: String,
    pub entity_type: String,
    pub entity_id: String,
    pub public_id: String,
    pub url: String,
    pub target_url: Option<String>,
}

/// Click counters for one slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAnalytics {
    pub slug: String,
    pub entity_type: String,
    pub entity_id: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link() -> NewShortLink {
        NewShortLink {
            slug: "X7gT5p".to_string(),
            entity_type: "product".to_string(),
            entity_id: "42".to_string(),
            public_id: "X7gT5p".to_string(),
            url: "https://yourdomain.co/product/X7gT5p".to_string(),
            target_url: None,
        }
    }

    #[test]
    fn test_from_new_starts_without_clicks() {
        let now = Utc::now();
        let link = ShortLink::from_new(new_link(), now);

        assert_eq!(link.slug, "X7gT5p");
        assert_eq!(link.entity_id, "42");
        assert_eq!(link.clicks, 0);
        assert_eq!(link.created_at, now);
        assert!(link.last_clicked_at.is_none());
    }

    #[test]
    fn test_analytics_view() {
        let mut link = ShortLink::from_new(new_link(), Utc::now());
        link.clicks = 7;

        let analytics = link.analytics();
        assert_eq!(analytics.clicks, 7);
        assert_eq!(analytics.entity_type, "product");
    }
}
