//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Trait for record storage backends
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Store a value with the given key, replacing any previous value
    async fn store(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Retrieve a value by key
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Delete a value by key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// List all keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
