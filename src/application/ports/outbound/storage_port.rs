use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("The resource already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
    #[error("Storage I/O error: {0}")]
    Io(String),
}

/// A single bucket of objects addressed by `{owner}/{file name}` keys
#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    /// Store bytes under a key that must not exist yet; returns the stored key
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError>;

    async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
