use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "record_media")]
pub struct Model {
    /// UUIDv7 primary key, generated server-side.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning treatment record.
    pub record_id: Uuid,

    /// `photo` or `video`.
    pub media_type: String,

    /// Count of same-type media for the record observed at upload time.
    /// Not recompacted when earlier items are deleted.
    pub sort_order: i32,

    /// Opaque object-store locator. Unique and stable once set.
    #[sea_orm(unique)]
    pub storage_key: String,

    pub file_size: i64,

    pub mime_type: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
