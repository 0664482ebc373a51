//! Random short code generation and slug format validation.
//!
//! Random codes are drawn from a fixed 62-symbol alphabet. Validation knows two
//! rule sets: the strict one used for generated short codes and the looser
//! "readable slug" rules used when slugs are derived from entity identifiers.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Symbols used for random short codes: digits, then uppercase, then lowercase.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated codes when the caller does not ask for another one.
pub const DEFAULT_ID_LENGTH: usize = 6;

/// Upper bound for readable (framework mode) slugs.
pub const MAX_FRAMEWORK_SLUG_LENGTH: usize = 100;

/// Rule set applied by [`is_valid_slug`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugMode {
    /// Exact length, alphabet symbols only.
    Shortening,
    /// 1-100 characters, ASCII alphanumerics and hyphens.
    Framework,
}

/// Generates a random short code of exactly `length` characters.
///
/// Every character is drawn uniformly from [`ALPHABET`]. With the default
/// length of 6 there are 62^6 (about 5.68e10) possible codes.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Checks a candidate slug against the rules of `mode`.
///
/// - [`SlugMode::Shortening`]: length equals `expected_length` and every
///   character belongs to [`ALPHABET`].
/// - [`SlugMode::Framework`]: length within `1..=100`, characters limited to
///   ASCII alphanumerics and `-`. `expected_length` is ignored.
///
/// Empty input is rejected in both modes. Never panics.
pub fn is_valid_slug(candidate: &str, expected_length: usize, mode: SlugMode) -> bool {
    if candidate.is_empty() {
        return false;
    }

    match mode {
        SlugMode::Shortening => {
            candidate.len() == expected_length
                && candidate.bytes().all(|b| ALPHABET.contains(&b))
        }
        SlugMode::Framework => {
            candidate.len() <= MAX_FRAMEWORK_SLUG_LENGTH
                && candidate
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_has_62_unique_symbols() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
        assert_eq!(ALPHABET[0], b'0');
        assert_eq!(ALPHABET[10], b'A');
        assert_eq!(ALPHABET[36], b'a');
    }

    #[test]
    fn test_generate_code_has_requested_length() {
        for length in 1..=32 {
            let code = generate_code(length);
            assert_eq!(code.len(), length);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_generate_code_zero_length_is_empty() {
        assert!(generate_code(0).is_empty());
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<_> = (0..1000).map(|_| generate_code(DEFAULT_ID_LENGTH)).collect();
        assert!(codes.len() > 990);
    }

    #[test]
    fn test_generated_code_is_valid_in_shortening_mode() {
        let code = generate_code(8);
        assert!(is_valid_slug(&code, 8, SlugMode::Shortening));
    }

    #[test]
    fn test_shortening_mode_rules() {
        assert!(is_valid_slug("X7gT5p", 6, SlugMode::Shortening));
        assert!(!is_valid_slug("X7gT5", 6, SlugMode::Shortening));
        assert!(!is_valid_slug("X7gT5pq", 6, SlugMode::Shortening));
        assert!(!is_valid_slug("X7g-5p", 6, SlugMode::Shortening));
        assert!(!is_valid_slug("X7g_5p", 6, SlugMode::Shortening));
        assert!(!is_valid_slug("", 0, SlugMode::Shortening));
        assert!(!is_valid_slug("", 6, SlugMode::Shortening));
    }

    #[test]
    fn test_shortening_mode_rejects_non_ascii() {
        assert!(!is_valid_slug("abcdé", 6, SlugMode::Shortening));
        assert!(!is_valid_slug("abcdéf", 7, SlugMode::Shortening));
    }

    #[test]
    fn test_framework_mode_rules() {
        assert!(is_valid_slug("user-123", 6, SlugMode::Framework));
        assert!(is_valid_slug("a", 6, SlugMode::Framework));
        assert!(is_valid_slug(&"a".repeat(100), 6, SlugMode::Framework));
        assert!(!is_valid_slug(&"a".repeat(101), 6, SlugMode::Framework));
        assert!(!is_valid_slug("has space", 6, SlugMode::Framework));
        assert!(!is_valid_slug("dot.ted", 6, SlugMode::Framework));
        assert!(!is_valid_slug("", 6, SlugMode::Framework));
    }
}
