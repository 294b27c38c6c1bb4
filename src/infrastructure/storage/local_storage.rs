//! Filesystem-backed object storage
//!
//! Objects of one bucket live under `{root}/{bucket}/{key}`, where a key is
//! a relative path such as `{user id}/{file name}`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::outbound::{ObjectStoragePort, StorageError};

pub struct LocalObjectStorage {
    bucket_dir: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(root: impl AsRef<Path>, bucket: &str) -> Self {
        Self {
            bucket_dir: root.as_ref().join(bucket),
        }
    }

    /// Resolve a key inside the bucket, refusing anything that could escape it
    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && !key.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.bucket_dir.join(relative))
    }
}

fn io_error(key: &str, err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
        ErrorKind::AlreadyExists => StorageError::AlreadyExists(key.to_string()),
        _ => StorageError::Io(err.to_string()),
    }
}

#[async_trait]
impl ObjectStoragePort for LocalObjectStorage {
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| io_error(key, e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        debug!(key, size = bytes.len(), "Stored object");
        Ok(key.to_string())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(key)?;
        fs::read(&path).await.map_err(|e| io_error(key, e))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        fs::remove_file(&path).await.map_err(|e| io_error(key, e))
    }
}
