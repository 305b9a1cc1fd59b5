use uuid::Uuid;

use crate::entity::record_media;

/// Resolve the storage key displayed for one before/after slot of a record.
///
/// The representative reference wins when it names a media item present in
/// the record's media list; otherwise the legacy single-slot key is used.
/// This fallback chain is the compatibility bridge between the single-image
/// era and the media-collection era of the data model.
pub fn resolve_display_key<'a>(
    representative: Option<Uuid>,
    legacy_key: &'a str,
    media: &'a [record_media::Model],
) -> Option<&'a str> {
    if let Some(id) = representative
        && let Some(item) = media.iter().find(|m| m.id == id)
    {
        return Some(&item.storage_key);
    }
    if !legacy_key.is_empty() {
        return Some(legacy_key);
    }
    None
}
