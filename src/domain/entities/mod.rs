//! Core data model.
//!
//! - [`GenerateOptions`], [`GenerationRequest`], [`GenerationResult`] - slug generation
//! - [`ResolutionResult`], [`EntityRecord`], [`EntityMapping`] - slug resolution
//! - [`ShortLink`], [`NewShortLink`], [`LinkAnalytics`] - persisted lookup records
//! - [`ShortenerSettings`] - defaults shared by every call
//! - [`BatchItem`], [`BatchSummary`] - batch creation
//!
//! Creation inputs follow the "New Type" pattern used across the crate:
//! `NewShortLink` is what gets saved, `ShortLink` is what storage returns.

pub mod batch;
pub mod entity;
pub mod generation;
pub mod link;
pub mod resolution;
pub mod settings;

pub use batch::{BatchItem, BatchSummary};
pub use entity::{EntityMapping, EntityRecord, ResolutionSettings, ResolutionStrategy};
pub use generation::{
    GenerateOptions, GeneratedSlug, GenerationMode, GenerationRequest, GenerationResult,
};
pub use link::{LinkAnalytics, NewShortLink, ShortLink};
pub use resolution::ResolutionResult;
pub use settings::ShortenerSettings;
