use std::io::Cursor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Metadata stored alongside each object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// MIME content type recorded at upload time.
    pub content_type: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Key-addressed object storage.
///
/// Keys are opaque slash-separated locators. Writing to an existing key
/// replaces the previous object and its metadata.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under a key with the given content type.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(key, reader, content_type).await
    }

    /// Store data from an async reader under a key.
    async fn put_stream(
        &self,
        key: &str,
        reader: BoxReader,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Retrieve all bytes for an object.
    async fn get(&self, key: &str) -> Result<(Vec<u8>, ObjectMeta), StorageError> {
        let (mut reader, meta) = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok((buf, meta))
    }

    /// Retrieve an object as a streaming async reader plus its metadata.
    async fn get_stream(&self, key: &str) -> Result<(BoxReader, ObjectMeta), StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}
