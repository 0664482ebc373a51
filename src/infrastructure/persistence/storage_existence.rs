//! Existence check backed by a storage adapter.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::repositories::{ExistenceCheck, StorageAdapter};
use crate::error::AppError;

/// Answers collision queries with [`StorageAdapter::exists`].
pub struct StorageExistenceCheck<S: StorageAdapter> {
    storage: Arc<S>,
}

impl<S: StorageAdapter> StorageExistenceCheck<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: StorageAdapter> ExistenceCheck for StorageExistenceCheck<S> {
    async fn check_exists(&self, entity_type: &str, slug: &str) -> Result<bool, AppError> {
        self.storage.exists(entity_type, slug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockStorageAdapter;
    use serde_json::json;

    #[tokio::test]
    async fn test_delegates_to_storage() {
        let mut storage = MockStorageAdapter::new();
        storage
            .expect_exists()
            .withf(|entity_type, slug| entity_type == "product" && slug == "abc123")
            .times(1)
            .returning(|_, _| Ok(true));

        let check = StorageExistenceCheck::new(Arc::new(storage));
        assert!(check.check_exists("product", "abc123").await.unwrap());
    }

    #[tokio::test]
    async fn test_propagates_storage_failure() {
        let mut storage = MockStorageAdapter::new();
        storage
            .expect_exists()
            .times(1)
            .returning(|_, _| Err(AppError::unavailable("down", json!({}))));

        let check = StorageExistenceCheck::new(Arc::new(storage));
        let err = check.check_exists("product", "abc123").await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
    }
}
