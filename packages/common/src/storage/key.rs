use super::error::StorageError;

/// Validate an object storage key.
///
/// Keys are opaque slash-separated locators (e.g. `records/{id}/before.webp`).
/// Each path segment must be non-empty and must not be `.` or `..`, so a key
/// can never resolve outside the store root when mapped onto a filesystem.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".into()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!(
            "key must be relative: {key}"
        )));
    }
    if key.contains('\\') || key.contains('\0') {
        return Err(StorageError::InvalidKey(format!(
            "key contains forbidden characters: {key}"
        )));
    }
    for segment in key.split('/') {
        if segment.is_empty() {
            return Err(StorageError::InvalidKey(format!(
                "key contains an empty segment: {key}"
            )));
        }
        if segment == "." || segment == ".." {
            return Err(StorageError::InvalidKey(format!(
                "key contains a relative segment: {key}"
            )));
        }
    }
    Ok(())
}
