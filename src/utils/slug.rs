//! Readable slug derivation from arbitrary entity identifiers.

use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"));

/// Turns an entity identifier into a URL-safe readable slug.
///
/// Lower-cases the input, collapses every run of non-alphanumeric characters
/// into one hyphen and trims hyphens from both ends. Deterministic and
/// idempotent. Input without any ASCII alphanumerics yields an empty string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(derive_slug("USER_123"), "user-123");
/// assert_eq!(derive_slug("user.email@domain.com"), "user-email-domain-com");
/// ```
pub fn derive_slug(entity_id: &str) -> String {
    let lowered = entity_id.to_lowercase();
    let hyphenated = NON_ALPHANUMERIC_RUN.replace_all(&lowered, "-");

    hyphenated.trim_matches('-').to_string()
}
