mod common;

use common::{memory_shortener, settings};
use entity_shortener::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_create_resolve_and_track_clicks() {
    let shortener = memory_shortener(settings());

    let created = shortener.create("product", "42", GenerateOptions::new()).await;
    assert!(created.success);

    let resolved = shortener.resolve("product", &created.slug).await;
    assert!(resolved.success);
    assert!(!resolved.from_cache);
    assert_eq!(resolved.entity.as_ref().unwrap().entity_id, "42");

    let again = shortener.resolve("product", &created.slug).await;
    assert!(again.from_cache);

    assert_eq!(shortener.track_click("product", &created.slug).await.unwrap(), 1);
    assert_eq!(shortener.track_click("product", &created.slug).await.unwrap(), 2);

    let analytics = shortener
        .analytics("product", &created.slug)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(analytics.clicks, 2);
    assert!(analytics.last_clicked_at.is_some());
}

#[tokio::test]
async fn test_unknown_slug() {
    let shortener = memory_shortener(settings());

    let resolved = shortener.resolve("product", "Zz9Zz9").await;
    assert!(!resolved.success);
    assert_eq!(resolved.error_code(), Some("not_found"));

    let err = shortener.track_click("product", "Zz9Zz9").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    assert!(shortener.analytics("product", "Zz9Zz9").await.unwrap().is_none());
}

#[tokio::test]
async fn test_supplied_public_id_conflicts_on_save() {
    let shortener = memory_shortener(settings());

    let first = shortener
        .create("product", "1", GenerateOptions::new().public_id("LAMP42"))
        .await;
    assert!(first.success);

    let second = shortener
        .create("product", "2", GenerateOptions::new().public_id("LAMP42"))
        .await;
    assert!(!second.success);
    assert_eq!(second.error_code(), Some("conflict"));

    // Same slug under another entity type is fine.
    let other_type = shortener
        .create("user", "2", GenerateOptions::new().public_id("LAMP42"))
        .await;
    assert!(other_type.success);
}

#[tokio::test]
async fn test_framework_mode_conflict_and_cache_stats() {
    let shortener = memory_shortener(settings().with_shortening(false));

    let created = shortener.create("user", "USER_123", GenerateOptions::new()).await;
    assert_eq!(created.slug, "user-123");

    let clash = shortener.create("user", "user 123", GenerateOptions::new()).await;
    assert_eq!(clash.error_code(), Some("conflict"));

    // First creation missed, the clash hit the slug remembered after saving.
    let stats = shortener.collision_cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert!((stats.ratio - 0.5).abs() < f64::EPSILON);

    shortener.clear_collision_cache(None);
    let stats = shortener.collision_cache_stats();
    assert_eq!((stats.hits, stats.misses, stats.ratio), (0, 0, 0.0));

    // Storage still knows the slug after the cache is gone.
    let clash = shortener.create("user", "USER-123", GenerateOptions::new()).await;
    assert_eq!(clash.error_code(), Some("conflict"));
}

#[tokio::test]
async fn test_lookup_resolution_with_entity_mapping() {
    let storage = Arc::new(InMemoryStorage::new());
    storage
        .insert_entity("products", "42", json!({ "id": "42", "name": "Desk lamp" }))
        .await;

    let settings = settings().with_resolution(
        ResolutionSettings::default().with_mapping("product", EntityMapping::new("products")),
    );
    let shortener = EntityShortener::new(storage, settings);

    let created = shortener.create("product", "42", GenerateOptions::new()).await;
    let resolved = shortener.resolve("product", &created.slug).await;

    let entity = resolved.entity.unwrap();
    assert_eq!(entity.slug, created.slug);
    assert_eq!(entity.data["name"], "Desk lamp");
}

#[tokio::test]
async fn test_inline_resolution() {
    let storage = Arc::new(InMemoryStorage::new());
    storage
        .insert_entity("pages", "9", json!({ "id": 9, "handle": "about-us" }))
        .await;

    let settings = settings()
        .with_shortening(false)
        .with_resolution(ResolutionSettings::new(ResolutionStrategy::Inline).with_mapping(
            "page",
            EntityMapping::new("pages").with_columns("id", "handle"),
        ));
    let shortener = EntityShortener::new(storage, settings);

    let resolved = shortener.resolve("page", "about-us").await;
    assert!(resolved.success);
    assert_eq!(resolved.entity.as_ref().unwrap().entity_id, "9");

    let missing = shortener.resolve("post", "about-us").await;
    assert_eq!(missing.error_code(), Some("configuration_error"));
}

#[tokio::test]
async fn test_clear_resolution_cache() {
    let shortener = memory_shortener(settings());
    let created = shortener
        .create("product", "42", GenerateOptions::new().public_id("X7gT5p"))
        .await;

    shortener.resolve("product", &created.slug).await;
    assert!(shortener.resolve("product", &created.slug).await.from_cache);

    shortener.clear_resolution_cache(Some("product"));
    assert!(!shortener.resolve("product", &created.slug).await.from_cache);
}

#[tokio::test]
async fn test_pattern_slugs_resolve_with_readable_rules() {
    let shortener = memory_shortener(settings());
    let created = shortener
        .create(
            "promo",
            "7",
            GenerateOptions::new()
                .pattern("summer-sale-{publicId}")
                .public_id("WEEKEND2024"),
        )
        .await;
    assert!(created.success);

    let strict = shortener.resolve("promo", &created.slug).await;
    assert_eq!(strict.error_code(), Some("validation_error"));

    let rules = SlugRules {
        length: None,
        mode: SlugMode::Framework,
    };
    let resolved = shortener
        .resolve_with_rules("promo", &created.slug, rules)
        .await;
    assert!(resolved.success);
}

#[tokio::test]
async fn test_fixed_pattern_slug_taken_is_conflict() {
    let shortener = memory_shortener(settings());
    let options = GenerateOptions::new()
        .pattern("summer-sale-{publicId}")
        .include_in_slug(false);

    let first = shortener.create("promo", "7", options.clone()).await;
    assert!(first.success);
    assert_eq!(first.slug, "summer-sale");

    let second = shortener.create("promo", "8", options).await;
    assert!(!second.success);
    assert_eq!(second.error_code(), Some("conflict"));

    let stats = shortener.collision_cache_stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[tokio::test]
async fn test_custom_length_and_supplied_codes_round_trip() {
    let shortener = memory_shortener(settings());

    let long = shortener
        .create("product", "42", GenerateOptions::new().id_length(10))
        .await;
    assert!(long.success);
    assert_eq!(long.slug.len(), 10);

    let supplied = shortener
        .create("product", "43", GenerateOptions::new().public_id("SPRING24"))
        .await;
    assert!(supplied.success);

    let resolved = shortener.resolve("product", &long.slug).await;
    assert!(resolved.success);
    assert_eq!(resolved.entity.unwrap().entity_id, "42");

    let resolved = shortener.resolve("product", "SPRING24").await;
    assert!(resolved.success);
    assert_eq!(resolved.entity.unwrap().entity_id, "43");
}

#[tokio::test]
async fn test_unregistered_type_resolution_is_configuration_error() {
    let shortener = memory_shortener(settings().with_entity_types(["product"]));

    let result = shortener.resolve("order", "X7gT5p").await;

    assert!(!result.success);
    assert_eq!(result.error_code(), Some("configuration_error"));
}

#[tokio::test]
async fn test_batch_continues_after_failure() {
    let shortener = memory_shortener(settings().with_entity_types(["product"]));

    let items = vec![
        BatchItem::new("product", "1"),
        BatchItem::new("order", "2"),
        BatchItem::new("product", "3")
            .with_options(GenerateOptions::new().target_url("https://Shop.example.com/p/3")),
    ];

    let results = shortener.create_batch(items).await;
    let summary = BatchSummary::from_results(&results);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(results[1].error_code(), Some("configuration_error"));
    assert_eq!(
        results[2].target_url.as_deref(),
        Some("https://shop.example.com/p/3")
    );
    assert_eq!(shortener.storage().len().await, 2);
}

#[tokio::test]
async fn test_instances_do_not_share_caches() {
    let first = memory_shortener(settings().with_shortening(false));
    let second = memory_shortener(settings().with_shortening(false));

    first.create("user", "USER_1", GenerateOptions::new()).await;
    first.create("user", "USER_1", GenerateOptions::new()).await;

    assert_eq!(first.collision_cache_stats().hits, 1);
    assert_eq!(second.collision_cache_stats().hits, 0);
}

#[tokio::test]
async fn test_health_and_close() {
    let shortener = memory_shortener(settings());
    shortener.initialize().await.unwrap();
    assert!(shortener.health_check().await);
    assert!(shortener.close().await.is_ok());
}
