use chrono::Utc;
use sea_orm::ActiveValue::Unchanged;
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::treatment_record;
use crate::models::media::RepresentativeField;

impl RepresentativeField {
    fn column(self) -> treatment_record::Column {
        match self {
            Self::BeforeMediaId => treatment_record::Column::BeforeMediaId,
            Self::AfterMediaId => treatment_record::Column::AfterMediaId,
        }
    }
}

/// Records for a customer, newest treatment first, ties broken by creation
/// time descending.
pub async fn list_records<C: ConnectionTrait>(
    db: &C,
    customer_id: Uuid,
) -> Result<Vec<treatment_record::Model>, DbErr> {
    treatment_record::Entity::find()
        .filter(treatment_record::Column::CustomerId.eq(customer_id))
        .order_by_desc(treatment_record::Column::TreatmentDate)
        .order_by_desc(treatment_record::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn get_record<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<treatment_record::Model>, DbErr> {
    treatment_record::Entity::find_by_id(id).one(db).await
}

pub async fn insert_record<C: ConnectionTrait>(
    db: &C,
    customer_id: Uuid,
    treatment_date: &str,
    memo: &str,
    before_image_key: &str,
    after_image_key: &str,
) -> Result<treatment_record::Model, DbErr> {
    let now = Utc::now();
    treatment_record::ActiveModel {
        id: Set(Uuid::now_v7()),
        customer_id: Set(customer_id),
        treatment_date: Set(treatment_date.to_string()),
        memo: Set(memo.to_string()),
        before_image_key: Set(before_image_key.to_string()),
        after_image_key: Set(after_image_key.to_string()),
        before_media_id: Set(None),
        after_media_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

/// Rewrite date and memo and refresh `updated_at`.
pub async fn update_record<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    treatment_date: &str,
    memo: &str,
) -> Result<treatment_record::Model, DbErr> {
    treatment_record::ActiveModel {
        id: Unchanged(id),
        treatment_date: Set(treatment_date.to_string()),
        memo: Set(memo.to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .update(db)
    .await
}

/// Rewrite both legacy image keys and refresh `updated_at`.
pub async fn update_record_images<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    before_image_key: &str,
    after_image_key: &str,
) -> Result<treatment_record::Model, DbErr> {
    treatment_record::ActiveModel {
        id: Unchanged(id),
        before_image_key: Set(before_image_key.to_string()),
        after_image_key: Set(after_image_key.to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .update(db)
    .await
}

/// Set exactly one of the two representative columns. `None` clears the slot.
pub async fn update_record_representative<C: ConnectionTrait>(
    db: &C,
    record_id: Uuid,
    field: RepresentativeField,
    media_id: Option<Uuid>,
) -> Result<treatment_record::Model, DbErr> {
    let mut model = treatment_record::ActiveModel {
        id: Unchanged(record_id),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    match field {
        RepresentativeField::BeforeMediaId => model.before_media_id = Set(media_id),
        RepresentativeField::AfterMediaId => model.after_media_id = Set(media_id),
    }
    model.update(db).await
}

/// Blank any representative reference to the given media id, in either slot.
/// Two statements so a media id occupying both slots of one record is
/// cleared from both.
pub async fn clear_representative_by_media_id<C: ConnectionTrait>(
    db: &C,
    media_id: Uuid,
) -> Result<(), DbErr> {
    treatment_record::Entity::update_many()
        .col_expr(
            treatment_record::Column::BeforeMediaId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(treatment_record::Column::BeforeMediaId.eq(media_id))
        .exec(db)
        .await?;
    treatment_record::Entity::update_many()
        .col_expr(
            treatment_record::Column::AfterMediaId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(treatment_record::Column::AfterMediaId.eq(media_id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn delete_record<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), DbErr> {
    treatment_record::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

/// Adapter-enforced cascade for customer deletion.
pub async fn delete_records_by_customer<C: ConnectionTrait>(
    db: &C,
    customer_id: Uuid,
) -> Result<(), DbErr> {
    treatment_record::Entity::delete_many()
        .filter(treatment_record::Column::CustomerId.eq(customer_id))
        .exec(db)
        .await?;
    Ok(())
}
