//! Pure helpers used by the generation engine.
//!
//! - [`code_generator`] - Random short codes and slug validation
//! - [`slug`] - Readable slugs derived from entity identifiers
//! - [`pattern`] - URL pattern templates with a public id placeholder
//! - [`url_builder`] - Public URL assembly
//! - [`url_normalizer`] - Destination URL normalization

pub mod code_generator;
pub mod pattern;
pub mod slug;
pub mod url_builder;
pub mod url_normalizer;
