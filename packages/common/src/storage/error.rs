use thiserror::Error;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No object exists under the requested key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The key is empty, absolute, or escapes the store root.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The metadata sidecar could not be read or parsed.
    #[error("corrupt object metadata for {key}: {detail}")]
    CorruptMetadata { key: String, detail: String },
}
