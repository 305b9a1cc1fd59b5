use uuid::Uuid;

use crate::models::media::MediaCategory;

/// Extension of an uploaded filename: the part after the last dot, when
/// non-empty.
pub fn file_extension(filename: &str) -> Option<&str> {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Storage key for a media item: `records/{record_id}/media/{media_id}.{ext}`.
pub fn media_storage_key(record_id: Uuid, media_id: Uuid, ext: &str) -> String {
    format!("records/{record_id}/media/{media_id}.{ext}")
}

/// Storage key for a legacy single-slot image: `records/{record_id}/{slot}.{ext}`.
///
/// The key shape is fixed per slot, so re-uploads overwrite the prior blob.
pub fn legacy_image_key(record_id: Uuid, slot: MediaCategory, ext: &str) -> String {
    format!("records/{record_id}/{}.{ext}", slot.as_str())
}
