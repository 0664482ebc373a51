//! Collaborator traits consumed by the application layer.
//!
//! - [`ExistenceCheck`] - "is this slug taken?" for collision avoidance
//! - [`StorageAdapter`] - persistence of bindings, entities and click counts
//!
//! Implementations live in `crate::infrastructure::persistence`; mocks are
//! generated with `mockall` for unit tests.

pub mod existence_check;
pub mod storage_adapter;

pub use existence_check::{CheckOutcome, ExistenceCheck};
pub use storage_adapter::StorageAdapter;

#[cfg(test)]
pub use existence_check::MockExistenceCheck;
#[cfg(test)]
pub use storage_adapter::MockStorageAdapter;
