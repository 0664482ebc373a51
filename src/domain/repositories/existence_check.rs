//! Existence check collaborator used for collision detection.

use crate::error::AppError;
use async_trait::async_trait;

/// Answers "is this slug already taken for this entity type?".
///
/// An `Err` means the question could not be answered right now (backend
/// down, timeout). It is never to be read as "taken".
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::StorageExistenceCheck`] - any storage adapter
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExistenceCheck: Send + Sync {
    async fn check_exists(&self, entity_type: &str, slug: &str) -> Result<bool, AppError>;
}

/// Tri-state answer of the collision checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The slug is taken.
    Exists,
    /// The backing check reported the slug as free.
    Absent,
    /// The backing check failed; nothing is known about the slug.
    Unavailable(String),
}

impl CheckOutcome {
    pub fn is_taken(&self) -> bool {
        matches!(self, CheckOutcome::Exists)
    }
}
