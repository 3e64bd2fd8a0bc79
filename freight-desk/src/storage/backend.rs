//! Storage backend trait.

use async_trait::async_trait;

use super::StorageError;

/// Raw byte storage behind [`LocalStore`](super::LocalStore).
///
/// Implementations only move bytes; typing happens in the store.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Keys starting with `prefix`, in no particular order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
