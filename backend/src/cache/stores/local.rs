//! In-memory store for tests and single-process deployments.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::error::{ErrorContext, StoreError, StoreResult};
use crate::cache::store::KeyValueStore;

/// In-memory key-value store.
///
/// Cloning is cheap and clones share the same data. Health and write failures
/// can be toggled to exercise the cache's degraded paths.
///
/// # Example
/// ```
/// use transit_engine::cache::{KeyValueStore, LocalStore};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let store = LocalStore::new();
///     store.write("k", "v").await.unwrap();
///     assert_eq!(store.read("k").await.unwrap().as_deref(), Some("v"));
/// });
/// ```
#[derive(Clone, Default)]
pub struct LocalStore {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    entries: HashMap<String, String>,
    is_healthy: bool,
    fail_writes: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            is_healthy: true,
            fail_writes: false,
        }
    }
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    ///
    /// An unhealthy store fails every operation.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Make writes fail while reads keep working.
    pub fn set_fail_writes(&self, fail: bool) {
        self.data.write().fail_writes = fail;
    }

    pub fn len(&self) -> usize {
        self.data.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_healthy(&self, operation: &str, key: Option<&str>) -> StoreResult<()> {
        if self.data.read().is_healthy {
            return Ok(());
        }
        let mut context = ErrorContext::new(operation);
        if let Some(key) = key {
            context = context.with_key(key);
        }
        Err(StoreError::unavailable_with_context(
            "local store marked unhealthy",
            context,
        ))
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        self.ensure_healthy("read", Some(key))?;
        Ok(self.data.read().entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.ensure_healthy("write", Some(key))?;
        let mut data = self.data.write();
        if data.fail_writes {
            return Err(StoreError::io_with_context(
                "write rejected",
                ErrorContext::new("write").with_key(key),
            ));
        }
        data.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.ensure_healthy("delete", Some(key))?;
        self.data.write().entries.remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> StoreResult<Vec<String>> {
        self.ensure_healthy("list_keys", None)?;
        Ok(self.data.read().entries.keys().cloned().collect())
    }

    async fn clear(&self, prefix: &str) -> StoreResult<usize> {
        self.ensure_healthy("clear", None)?;
        let mut data = self.data.write();
        let before = data.entries.len();
        data.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - data.entries.len())
    }
}
