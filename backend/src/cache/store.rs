//! The durable key-value store the cache is written against.

use async_trait::async_trait;

use super::error::StoreResult;

/// Minimal async key-value store.
///
/// Values are opaque strings (the cache stores JSON envelopes). Implementations
/// must allow independent per-key access; concurrent writes to the same key
/// resolve as last-write-wins.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one store can back every request
/// handler through an `Arc<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is reachable but not serving
    /// - `Err(StoreError)` if the check itself failed
    async fn health_check(&self) -> StoreResult<bool>;

    /// Value stored under `key`, `None` when absent.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or replace the value under `key`.
    async fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Every key currently stored.
    async fn list_keys(&self) -> StoreResult<Vec<String>>;

    /// Remove every key starting with `prefix`, returning how many were removed.
    async fn clear(&self, prefix: &str) -> StoreResult<usize> {
        let mut removed = 0;
        for key in self.list_keys().await? {
            if key.starts_with(prefix) {
                self.delete(&key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
