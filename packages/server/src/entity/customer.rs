use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// UUIDv7 primary key, generated server-side.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name. Non-empty after trimming.
    pub name: String,

    /// Phonetic reading of the name. Empty string when not provided.
    pub name_kana: String,

    #[sea_orm(has_many)]
    pub records: HasMany<super::treatment_record::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
