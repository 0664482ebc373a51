//! Domain layer: data model and collaborator contracts.
//!
//! - [`entities`] - Requests, results, records and settings
//! - [`repositories`] - Traits for the existence check and storage adapter
//!
//! Nothing here talks to a backend; `crate::infrastructure` provides the
//! implementations and `crate::application` the orchestration.

pub mod entities;
pub mod repositories;
