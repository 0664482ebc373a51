//! Infrastructure layer: caches and storage backends implementing the domain
//! collaborator traits.

pub mod cache;
pub mod persistence;
