use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::record_media;
use crate::models::media::MediaType;

/// Media for a record, ordered by `(sort_order, created_at)` ascending.
pub async fn list_media<C: ConnectionTrait>(
    db: &C,
    record_id: Uuid,
) -> Result<Vec<record_media::Model>, DbErr> {
    record_media::Entity::find()
        .filter(record_media::Column::RecordId.eq(record_id))
        .order_by_asc(record_media::Column::SortOrder)
        .order_by_asc(record_media::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn get_media<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<record_media::Model>, DbErr> {
    record_media::Entity::find_by_id(id).one(db).await
}

/// Current count for one (record, media type) pair. Feeds both the count
/// ceiling and the next `sort_order`.
pub async fn count_media<C: ConnectionTrait>(
    db: &C,
    record_id: Uuid,
    media_type: MediaType,
) -> Result<u64, DbErr> {
    record_media::Entity::find()
        .filter(record_media::Column::RecordId.eq(record_id))
        .filter(record_media::Column::MediaType.eq(media_type.as_str()))
        .count(db)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_media<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    record_id: Uuid,
    media_type: MediaType,
    sort_order: i32,
    storage_key: &str,
    file_size: i64,
    mime_type: &str,
) -> Result<record_media::Model, DbErr> {
    record_media::ActiveModel {
        id: Set(id),
        record_id: Set(record_id),
        media_type: Set(media_type.as_str().to_string()),
        sort_order: Set(sort_order),
        storage_key: Set(storage_key.to_string()),
        file_size: Set(file_size),
        mime_type: Set(mime_type.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
}

pub async fn delete_media<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), DbErr> {
    record_media::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

/// Adapter-enforced cascade for record deletion.
pub async fn delete_media_by_record<C: ConnectionTrait>(
    db: &C,
    record_id: Uuid,
) -> Result<(), DbErr> {
    record_media::Entity::delete_many()
        .filter(record_media::Column::RecordId.eq(record_id))
        .exec(db)
        .await?;
    Ok(())
}
