//! Public URL assembly.

/// Strips any `scheme://` prefix, surrounding whitespace and trailing slashes.
///
/// ```ignore
/// assert_eq!(normalize_domain("HTTP://yourdomain.co/"), "yourdomain.co");
/// assert_eq!(normalize_domain("yourdomain.co/links//"), "yourdomain.co/links");
/// ```
pub fn normalize_domain(domain: &str) -> &str {
    let trimmed = domain.trim();

    let without_scheme = match trimmed.find("://") {
        Some(pos)
            if trimmed[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            &trimmed[pos + 3..]
        }
        _ => trimmed,
    };

    without_scheme.trim_end_matches('/')
}

/// Builds the public URL of a slug.
///
/// The domain is normalized with [`normalize_domain`] and always served over
/// HTTPS. When `include_entity_type` is set the entity type becomes a path
/// segment in front of the slug.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     build_public_url("yourdomain.co", "product", "X7gT5p", true),
///     "https://yourdomain.co/product/X7gT5p"
/// );
/// ```
pub fn build_public_url(
    domain: &str,
    entity_type: &str,
    slug: &str,
    include_entity_type: bool,
) -> String {
    let base = normalize_domain(domain);

    if include_entity_type {
        format!("https://{}/{}/{}", base, entity_type.trim_matches('/'), slug)
    } else {
        format!("https://{}/{}", base, slug)
    }
}
