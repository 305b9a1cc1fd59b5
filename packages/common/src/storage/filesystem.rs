use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::key::validate_key;
use super::traits::{BoxReader, ObjectMeta, ObjectStore};

/// Filesystem-backed key-addressed object store.
///
/// Objects live under `{root}/blobs/{key}` with a JSON metadata sidecar at
/// `{root}/meta/{key}.json`. Writes go through a temp file and a rename so a
/// reader never observes a half-written object.
pub struct FilesystemObjectStore {
    root: PathBuf,
}

impl FilesystemObjectStore {
    /// Create a new store rooted at `root`, creating the directory layout.
    pub async fn new(root: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(root.join("blobs")).await?;
        fs::create_dir_all(root.join("meta")).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join("blobs").join(key)
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join(format!("{key}.json"))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }

    async fn read_meta(&self, key: &str, blob_path: &Path) -> Result<ObjectMeta, StorageError> {
        match fs::read(self.meta_path(key)).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StorageError::CorruptMetadata {
                    key: key.to_string(),
                    detail: e.to_string(),
                })
            }
            // Tolerate a missing sidecar rather than failing the read.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let size = fs::metadata(blob_path).await?.len();
                Ok(ObjectMeta {
                    content_type: String::new(),
                    size,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put_stream(
        &self,
        key: &str,
        mut reader: BoxReader,
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_key(key)?;

        let temp_path = self.temp_path();
        let result = async {
            let mut temp_file = fs::File::create(&temp_path).await?;
            let size = tokio::io::copy(&mut reader, &mut temp_file).await?;
            temp_file.flush().await?;
            drop(temp_file);

            let blob_path = self.blob_path(key);
            if let Some(parent) = blob_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::rename(&temp_path, &blob_path).await?;

            let meta = ObjectMeta {
                content_type: content_type.to_string(),
                size,
            };
            let meta_path = self.meta_path(key);
            if let Some(parent) = meta_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            let encoded = serde_json::to_vec(&meta).map_err(|e| {
                StorageError::CorruptMetadata {
                    key: key.to_string(),
                    detail: e.to_string(),
                }
            })?;
            fs::write(&meta_path, encoded).await?;
            Ok(())
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&temp_path).await;
        }
        result
    }

    async fn get_stream(&self, key: &str) -> Result<(BoxReader, ObjectMeta), StorageError> {
        validate_key(key)?;

        let blob_path = self.blob_path(key);
        let file = match fs::File::open(&blob_path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let meta = self.read_meta(key, &blob_path).await?;
        let reader: BoxReader = Box::new(BufReader::new(file));
        Ok((reader, meta))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        match fs::metadata(self.blob_path(key)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let deleted = match fs::remove_file(self.blob_path(key)).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        // The sidecar is advisory; ignore a missing one.
        if let Err(e) = fs::remove_file(self.meta_path(key)).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("failed to remove metadata sidecar for {key}: {e}");
        }
        Ok(deleted)
    }
}
