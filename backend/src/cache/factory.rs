//! Store factory for dependency injection.
//!
//! Builds the configured [`KeyValueStore`] from [`StoreSettings`].

use std::str::FromStr;
use std::sync::Arc;

use super::error::{StoreError, StoreResult};
use super::store::KeyValueStore;
use super::stores::{FileStore, LocalStore};
use crate::config::StoreSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store, lost on restart
    Memory,
    /// One file per key under a directory
    File,
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "local" | "in-memory" => Ok(Self::Memory),
            "file" | "fs" | "filesystem" => Ok(Self::File),
            _ => Err(format!("Unknown store type: {}", s)),
        }
    }
}

pub struct StoreFactory;

impl StoreFactory {
    /// Create the store described by `settings`.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn KeyValueStore>)` - ready to use store
    /// * `Err(StoreError)` - unknown type, missing path, or the directory could not be created
    pub async fn create(settings: &StoreSettings) -> StoreResult<Arc<dyn KeyValueStore>> {
        let store_type = settings
            .store_type()
            .map_err(StoreError::configuration)?;

        match store_type {
            StoreType::Memory => Ok(Self::create_local()),
            StoreType::File => {
                let path = settings.path.as_ref().ok_or_else(|| {
                    StoreError::configuration("file store requires 'store.path' setting")
                })?;
                let store = FileStore::open(path).await?;
                log::info!("Using file store at {}", store.root().display());
                Ok(Arc::new(store))
            }
        }
    }

    pub fn create_local() -> Arc<dyn KeyValueStore> {
        Arc::new(LocalStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_parsing() {
        assert_eq!("memory".parse::<StoreType>().unwrap(), StoreType::Memory);
        assert_eq!("FILE".parse::<StoreType>().unwrap(), StoreType::File);
        assert!("redis".parse::<StoreType>().is_err());
    }

    #[tokio::test]
    async fn test_file_store_requires_path() {
        let settings = StoreSettings {
            kind: "file".to_string(),
            path: None,
            ..StoreSettings::default()
        };
        let err = StoreFactory::create(&settings).await.err().unwrap();
        assert!(matches!(err, StoreError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_creates_working_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let settings = StoreSettings {
            kind: "file".to_string(),
            path: Some(dir.path().join("cache")),
            ..StoreSettings::default()
        };
        let store = StoreFactory::create(&settings).await.unwrap();
        store.write("k", "v").await.unwrap();
        assert!(dir.path().join("cache").is_dir());
    }
}
