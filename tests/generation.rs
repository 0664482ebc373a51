mod common;

use common::{DOMAIN, ScriptedExistenceCheck, UnavailableExistenceCheck, settings};
use entity_shortener::application::services::SlugService;
use entity_shortener::infrastructure::cache::CollisionCache;
use entity_shortener::prelude::*;
use std::sync::Arc;

fn slug_service<E: ExistenceCheck>(
    check: Arc<E>,
    settings: ShortenerSettings,
) -> SlugService<E> {
    SlugService::new(check, Arc::new(CollisionCache::new()), Arc::new(settings))
}

#[tokio::test]
async fn test_succeeds_on_third_candidate() {
    let check = Arc::new(ScriptedExistenceCheck::new([Ok(true), Ok(true), Ok(false)]));
    let service = slug_service(check.clone(), settings());

    let result = service.generate("product", "42", GenerateOptions::new()).await;

    assert!(result.success);
    assert_eq!(check.calls(), 3);
    assert!(is_valid_slug(&result.slug, 6, SlugMode::Shortening));
}

#[tokio::test]
async fn test_exhaustion_after_four_checks() {
    let check = Arc::new(ScriptedExistenceCheck::always_taken(10));
    let service = slug_service(check.clone(), settings());

    let result = service.generate("product", "42", GenerateOptions::new()).await;

    assert!(!result.success);
    assert!(result.slug.is_empty());
    assert_eq!(check.calls(), (MAX_ATTEMPTS - 1) as usize);
    assert_eq!(result.error_code(), Some("retry_exhausted"));
}

#[tokio::test]
async fn test_unavailable_check_still_generates() {
    let check = Arc::new(UnavailableExistenceCheck::default());
    let service = slug_service(check.clone(), settings());

    let result = service.generate("product", "42", GenerateOptions::new()).await;

    assert!(result.success);
    assert!(result.collision_check_skipped);
    assert_eq!(check.calls(), 1);
    assert_eq!(check.checked(), vec![result.slug.clone()]);
}

#[tokio::test]
async fn test_entity_derived_conflict_is_immediate() {
    let check = Arc::new(ScriptedExistenceCheck::always_taken(1));
    let service = slug_service(check.clone(), settings().with_shortening(false));

    let result = service.generate("user", "USER_123", GenerateOptions::new()).await;

    assert!(!result.success);
    assert_eq!(check.calls(), 1);
    assert_eq!(result.error_code(), Some("conflict"));
}

#[tokio::test]
async fn test_pattern_with_supplied_public_id() {
    let check = Arc::new(ScriptedExistenceCheck::default());
    let service = slug_service(check.clone(), settings());

    let result = service
        .generate(
            "promo",
            "7",
            GenerateOptions::new()
                .pattern("summer-sale-{publicId}")
                .public_id("WEEKEND2024")
                .include_in_slug(true),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.slug, "summer-sale-WEEKEND2024");
    assert_eq!(check.calls(), 0);
}

#[tokio::test]
async fn test_url_assembly() {
    let check = Arc::new(ScriptedExistenceCheck::default());

    let with_path = slug_service(check.clone(), settings().with_entity_type_in_path(true));
    let result = with_path
        .generate("product", "42", GenerateOptions::new().public_id("X7gT5p"))
        .await;
    assert_eq!(result.url.as_deref(), Some("https://yourdomain.co/product/X7gT5p"));

    let without_path = slug_service(check, settings());
    let result = without_path
        .generate("product", "42", GenerateOptions::new().public_id("X7gT5p"))
        .await;
    assert_eq!(result.url.as_deref(), Some("https://yourdomain.co/X7gT5p"));

    assert_eq!(
        build_public_url(&format!("https://{DOMAIN}/"), "product", "X7gT5p", true),
        "https://yourdomain.co/product/X7gT5p"
    );
}

#[tokio::test]
async fn test_options_from_json_with_aliases() {
    let check = Arc::new(ScriptedExistenceCheck::default());
    let service = slug_service(check, settings());

    let options: GenerateOptions = serde_json::from_str(
        r#"{ "urlPattern": "summer-sale-{customId}", "customId": "WEEKEND2024", "includeInSlug": true }"#,
    )
    .unwrap();
    let result = service.generate("promo", "7", options).await;

    assert_eq!(result.slug, "summer-sale-WEEKEND2024");
}

#[test]
fn test_derived_slug_scenarios() {
    assert_eq!(derive_slug("USER_123"), "user-123");
    assert_eq!(derive_slug("order#12345"), "order-12345");
    assert_eq!(derive_slug("user.email@domain.com"), "user-email-domain-com");
}
