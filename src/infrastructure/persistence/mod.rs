//! Storage backends for short links.
//!
//! - [`InMemoryStorage`] - process-local maps, for tests and single-process use
//! - [`PgStorage`] - PostgreSQL lookup table plus entity tables
//! - [`RedisStorage`] - Redis keys
//!
//! [`StorageExistenceCheck`] adapts any backend into the existence check used
//! by slug generation.

mod memory_storage;
mod pg_storage;
mod redis_storage;
mod storage_existence;

pub use memory_storage::InMemoryStorage;
pub use pg_storage::{PgStorage, PgStorageOptions};
pub use redis_storage::RedisStorage;
pub use storage_existence::StorageExistenceCheck;
