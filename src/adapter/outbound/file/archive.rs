//! Directory-backed archive: one pretty-printed JSON file per key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::atomic::{blocking, read_json, write_json};
use crate::error::{Error, Result};
use crate::port::outbound::store::ArchiveStore;

pub struct FileArchive {
    dir: PathBuf,
}

impl FileArchive {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and decode the document at `key` on the calling thread.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        read_json(&self.path_for(key)?)
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Store(format!("invalid archive key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl ArchiveStore for FileArchive {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        blocking(move || read_json(&path)).await
    }

    async fn put(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        let value = value.clone();
        blocking(move || write_json(&path, &value)).await?;
        debug!(key, "Archive object written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_overwrites_whole_object() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FileArchive::new(dir.path());

        assert_eq!(archive.get("base_volumes").await.unwrap(), None);
        archive.put("base_volumes", &json!({"A": 1, "B": 2})).await.unwrap();
        archive.put("base_volumes", &json!({"A": 3})).await.unwrap();

        assert_eq!(
            archive.get("base_volumes").await.unwrap(),
            Some(json!({"A": 3}))
        );
        assert!(dir.path().join("base_volumes.json").exists());
    }

    #[tokio::test]
    async fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FileArchive::new(dir.path());
        assert!(archive.get("../escape").await.is_err());
        assert!(archive.put("", &json!(null)).await.is_err());
    }
}
