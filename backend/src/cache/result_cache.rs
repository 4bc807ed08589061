use chrono::Duration;
use log::{debug, warn};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::error::{ErrorContext, StoreError};
use super::keys::{CacheKey, TtlTable};
use super::store::KeyValueStore;

pub const DEFAULT_NAMESPACE: &str = "transit";

/// Time-to-live cache of serialized results over a [`KeyValueStore`].
///
/// The cache never fails its caller. Store errors are logged and treated as a
/// miss (reads) or a no-op (writes); entries that no longer deserialize are
/// deleted on sight. Only keys under the cache namespace are ever touched by
/// [`sweep_expired`](Self::sweep_expired) and [`clear`](Self::clear).
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    namespace: String,
    ttl: TtlTable,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            namespace: DEFAULT_NAMESPACE.to_string(),
            ttl: TtlTable::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_ttl_table(mut self, ttl: TtlTable) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }

    /// Store `value` under `key`. Without an explicit `ttl` the category default applies.
    pub async fn set<T>(&self, key: &CacheKey, value: &T, ttl: Option<Duration>)
    where
        T: Serialize + Sync + ?Sized,
    {
        let rendered = key.render(&self.namespace);
        let ttl = ttl.unwrap_or_else(|| self.ttl.ttl_for(key.category()));
        let entry = CacheEntry::new(value, self.clock.now(), ttl);

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                let err = StoreError::serialization_with_context(
                    e.to_string(),
                    ErrorContext::new("set").with_key(&rendered),
                );
                warn!("Cache: not storing entry: {}", err);
                return;
            }
        };

        match self.store.write(&rendered, &json).await {
            Ok(()) => debug!("Cache: stored {} (ttl {}s)", rendered, ttl.num_seconds()),
            Err(e) => warn!("Cache: write failed for {}: {}", rendered, e),
        }
    }

    /// The value under `key`, or `None` when absent, expired, corrupt or unreadable.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let rendered = key.render(&self.namespace);

        let raw = match self.store.read(&rendered).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache: miss for {}", rendered);
                return None;
            }
            Err(e) => {
                warn!("Cache: read failed for {}: {}", rendered, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                let err = StoreError::serialization_with_context(
                    e.to_string(),
                    ErrorContext::new("get").with_key(&rendered),
                );
                warn!("Cache: dropping corrupt entry: {}", err);
                self.remove(&rendered).await;
                return None;
            }
        };

        match entry.is_valid_at(self.clock.now()) {
            Some(true) => {
                debug!("Cache: hit for {}", rendered);
                Some(entry.payload)
            }
            Some(false) => {
                if let Some(at) = entry.expires_at() {
                    debug!("Cache: entry {} expired at {}", rendered, at);
                }
                self.remove(&rendered).await;
                None
            }
            None => {
                let err = StoreError::serialization_with_context(
                    format!("ttl of {}ms is out of range", entry.ttl_ms),
                    ErrorContext::new("get").with_key(&rendered),
                );
                warn!("Cache: dropping corrupt entry: {}", err);
                self.remove(&rendered).await;
                None
            }
        }
    }

    /// Delete every expired or corrupt entry in the namespace.
    ///
    /// # Returns
    /// How many entries were removed.
    pub async fn sweep_expired(&self) -> usize {
        let keys = match self.store.list_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Cache: sweep could not list keys: {}", e);
                return 0;
            }
        };

        let prefix = self.prefix();
        let now = self.clock.now();
        let mut removed = 0;

        for key in keys.iter().filter(|k| k.starts_with(&prefix)) {
            let raw = match self.store.read(key).await {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Cache: sweep could not read {}: {}", key, e);
                    continue;
                }
            };

            // Undecodable envelopes and out-of-range timings count as stale
            let stale = match serde_json::from_str::<CacheEntry<IgnoredAny>>(&raw) {
                Ok(entry) => entry.is_valid_at(now) != Some(true),
                Err(_) => true,
            };

            if stale && self.remove(key).await {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!("Cache: sweep removed {} entries", removed);
        }
        removed
    }

    /// Delete every entry in the namespace, returning how many were removed.
    pub async fn clear(&self) -> usize {
        match self.store.clear(&self.prefix()).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Cache: clear failed: {}", e);
                0
            }
        }
    }

    pub async fn health_check(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!("Cache: store health check failed: {}", e);
                false
            }
        }
    }

    async fn remove(&self, key: &str) -> bool {
        match self.store.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache: delete failed for {}: {}", key, e);
                false
            }
        }
    }
}
