use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "treatment_records")]
pub struct Model {
    /// UUIDv7 primary key, generated server-side.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning customer. Checked at creation time only.
    pub customer_id: Uuid,

    #[sea_orm(belongs_to, from = "customer_id", to = "id")]
    pub customer: BelongsTo<super::customer::Entity>,

    /// Treatment date as an opaque date string (e.g. `2026-08-29`).
    pub treatment_date: String,

    /// Free-text memo. Empty string when not provided.
    pub memo: String,

    /// Legacy single-slot image keys, superseded by `record_media` but kept
    /// for backward compatibility. Empty string means unset.
    pub before_image_key: String,
    pub after_image_key: String,

    /// Representative media references. Must point at a photo owned by this
    /// record; cleared when the referenced media is deleted.
    pub before_media_id: Option<Uuid>,
    pub after_media_id: Option<Uuid>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
