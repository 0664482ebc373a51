//! URL pattern templates with a single public id placeholder.
//!
//! A template such as `summer-sale-{publicId}` fixes the readable part of a
//! slug and leaves one slot for the public id. Several placeholder spellings
//! are accepted for compatibility, but a template may contain exactly one.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Placeholder spellings understood in templates.
pub const PLACEHOLDERS: &[&str] = &["{publicId}", "{public_id}", "{customId}", "{id}"];

static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("static regex is valid"));

/// A validated pattern template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    template: String,
    placeholder: &'static str,
    start: usize,
}

impl UrlPattern {
    /// Parses and validates a template.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PatternMalformed`] when the template has no
    /// placeholder, contains an unsupported `{...}` token, or contains more
    /// than one placeholder.
    pub fn parse(template: &str) -> Result<Self, AppError> {
        let mut found: Option<(&'static str, usize)> = None;

        for token in PLACEHOLDER_TOKEN.find_iter(template) {
            let Some(known) = PLACEHOLDERS.iter().find(|p| **p == token.as_str()) else {
                return Err(AppError::pattern_malformed(
                    format!("Unsupported placeholder {} in pattern", token.as_str()),
                    json!({ "pattern": template, "supported": PLACEHOLDERS }),
                ));
            };

            if found.is_some() {
                return Err(AppError::pattern_malformed(
                    "Pattern must contain exactly one placeholder",
                    json!({ "pattern": template }),
                ));
            }

            found = Some((*known, token.start()));
        }

        let Some((placeholder, start)) = found else {
            return Err(AppError::pattern_malformed(
                "Pattern is missing a placeholder",
                json!({ "pattern": template, "supported": PLACEHOLDERS }),
            ));
        };

        Ok(Self {
            template: template.to_string(),
            placeholder,
            start,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The placeholder spelling used by this template.
    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    /// Replaces the placeholder with `public_id`.
    pub fn substitute(&self, public_id: &str) -> String {
        let end = self.start + self.placeholder.len();
        format!(
            "{}{}{}",
            &self.template[..self.start],
            public_id,
            &self.template[end..]
        )
    }

    /// Removes the placeholder together with one adjacent hyphen.
    ///
    /// The hyphen before the placeholder is preferred; the one after it is
    /// used when the placeholder opens the template.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PatternMalformed`] if nothing is left.
    pub fn without_placeholder(&self) -> Result<String, AppError> {
        let end = self.start + self.placeholder.len();
        let before = &self.template[..self.start];
        let after = &self.template[end..];

        let stripped = if let Some(head) = before.strip_suffix('-') {
            format!("{head}{after}")
        } else if let Some(tail) = after.strip_prefix('-') {
            format!("{before}{tail}")
        } else {
            format!("{before}{after}")
        };

        if stripped.is_empty() {
            return Err(AppError::pattern_malformed(
                "Pattern is empty once the placeholder is removed",
                json!({ "pattern": self.template }),
            ));
        }

        Ok(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_every_placeholder_form() {
        for placeholder in PLACEHOLDERS {
            let template = format!("promo-{placeholder}");
            let pattern = UrlPattern::parse(&template).unwrap();
            assert_eq!(pattern.placeholder(), *placeholder);
        }
    }

    #[test]
    fn test_parse_rejects_missing_placeholder() {
        let err = UrlPattern::parse("summer-sale").unwrap_err();
        assert!(matches!(err, AppError::PatternMalformed { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_parse_rejects_unknown_placeholder() {
        let err = UrlPattern::parse("summer-{slug}").unwrap_err();
        assert!(matches!(err, AppError::PatternMalformed { .. }));
        assert!(err.to_string().contains("{slug}"));
    }

    #[test]
    fn test_parse_rejects_unknown_token_next_to_known_one() {
        assert!(UrlPattern::parse("{publicId}-{other}").is_err());
    }

    #[test]
    fn test_parse_rejects_two_placeholders() {
        let err = UrlPattern::parse("{publicId}-{customId}").unwrap_err();
        assert!(err.to_string().contains("exactly one"));

        assert!(UrlPattern::parse("{id}-{id}").is_err());
    }

    #[test]
    fn test_substitute() {
        let pattern = UrlPattern::parse("summer-sale-{publicId}").unwrap();
        assert_eq!(pattern.substitute("WEEKEND2024"), "summer-sale-WEEKEND2024");

        let pattern = UrlPattern::parse("{customId}-deal").unwrap();
        assert_eq!(pattern.substitute("ab12"), "ab12-deal");
    }

    #[test]
    fn test_without_placeholder_removes_preceding_hyphen() {
        let pattern = UrlPattern::parse("summer-sale-{publicId}").unwrap();
        assert_eq!(pattern.without_placeholder().unwrap(), "summer-sale");
    }

    #[test]
    fn test_without_placeholder_removes_following_hyphen() {
        let pattern = UrlPattern::parse("{publicId}-summer-sale").unwrap();
        assert_eq!(pattern.without_placeholder().unwrap(), "summer-sale");
    }

    #[test]
    fn test_without_placeholder_in_the_middle_removes_one_hyphen() {
        let pattern = UrlPattern::parse("summer-{id}-sale").unwrap();
        assert_eq!(pattern.without_placeholder().unwrap(), "summer-sale");
    }

    #[test]
    fn test_without_placeholder_only_placeholder_is_malformed() {
        let pattern = UrlPattern::parse("{publicId}").unwrap();
        assert!(pattern.without_placeholder().is_err());
    }
}
