//! One-file-per-key store on the local filesystem.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cache::error::{ErrorContext, StoreError, StoreResult};
use crate::cache::store::KeyValueStore;

const ENTRY_EXTENSION: &str = "entry";

/// Stores each key in its own file under a root directory.
///
/// File names are the hex encoding of the key, so any key is a valid name and
/// `list_keys` can recover it. Writes go to a temporary file that is renamed
/// into place, so readers never see a half-written value.
pub struct FileStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            StoreError::from(e).with_key(root.display().to_string())
        })?;
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", hex::encode(key), ENTRY_EXTENSION))
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != ENTRY_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }

    fn io_error(operation: &str, key: &str, err: std::io::Error) -> StoreError {
        StoreError::io_with_context(
            err.to_string(),
            ErrorContext::new(operation)
                .with_key(key)
                .with_details(format!("kind={:?}", err.kind())),
        )
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn health_check(&self) -> StoreResult<bool> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error("health_check", &self.root.display().to_string(), e)),
        }
    }

    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error("read", key, e)),
        }
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let target = self.path_for(key);
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = target.with_extension(format!("{}.tmp", n));

        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| Self::io_error("write", key, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(Self::io_error("write", key, e));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error("delete", key, e)),
        }
    }

    async fn list_keys(&self) -> StoreResult<Vec<String>> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| Self::io_error("list_keys", &self.root.display().to_string(), e))?;

        let mut keys = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| Self::io_error("list_keys", &self.root.display().to_string(), e))?
        {
            if let Some(key) = Self::key_from_path(&entry.path()) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_with_awkward_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let key = "transit:timing:2024-01-01:marriage/../x";
        store.write(key, "{\"a\":1}").await.unwrap();
        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(store.list_keys().await.unwrap(), vec![key.to_string()]);
    }

    #[tokio::test]
    async fn test_missing_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.read("nope").await.unwrap(), None);
        store.delete("nope").await.unwrap();
        store.write("k", "v").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("zz.entry"), "not hex").unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.write("k", "v").await.unwrap();
        assert_eq!(store.list_keys().await.unwrap(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_default_clear_removes_prefix_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).await.unwrap();
        assert!(store.health_check().await.unwrap());
        store.write("ns:a", "1").await.unwrap();
        store.write("ns:b", "1").await.unwrap();
        store.write("other", "1").await.unwrap();
        assert_eq!(store.clear("ns:").await.unwrap(), 2);
        assert_eq!(store.list_keys().await.unwrap(), vec!["other".to_string()]);
    }
}
