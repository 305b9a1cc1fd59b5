use chrono::Utc;
use sea_orm::ActiveValue::Unchanged;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LikeExpr;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::{customer, treatment_record};
use crate::models::customer::CustomerResponse;
use crate::models::shared::escape_like;

/// Base select joining the record aggregates onto each customer row.
fn with_aggregates() -> Select<customer::Entity> {
    customer::Entity::find()
        .left_join(treatment_record::Entity)
        .select_only()
        .column(customer::Column::Id)
        .column(customer::Column::Name)
        .column(customer::Column::NameKana)
        .column(customer::Column::CreatedAt)
        .column(customer::Column::UpdatedAt)
        .column_as(treatment_record::Column::Id.count(), "record_count")
        .column_as(
            treatment_record::Column::TreatmentDate.max(),
            "latest_treatment_date",
        )
        .group_by(customer::Column::Id)
}

/// List customers with aggregates, newest-updated first. A non-empty search
/// term filters by substring match on name or phonetic reading.
pub async fn list_customers<C: ConnectionTrait>(
    db: &C,
    search: Option<&str>,
) -> Result<Vec<CustomerResponse>, DbErr> {
    let mut select = with_aggregates().order_by_desc(customer::Column::UpdatedAt);

    if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        select = select.filter(
            Condition::any()
                .add(
                    Expr::col(customer::Column::Name)
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
                .add(
                    Expr::col(customer::Column::NameKana)
                        .like(LikeExpr::new(pattern).escape('\\')),
                ),
        );
    }

    select.into_model::<CustomerResponse>().all(db).await
}

pub async fn get_customer<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<CustomerResponse>, DbErr> {
    with_aggregates()
        .filter(customer::Column::Id.eq(id))
        .into_model::<CustomerResponse>()
        .one(db)
        .await
}

pub async fn insert_customer<C: ConnectionTrait>(
    db: &C,
    name: &str,
    name_kana: &str,
) -> Result<customer::Model, DbErr> {
    let now = Utc::now();
    customer::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name.to_string()),
        name_kana: Set(name_kana.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

/// Rewrite both name fields and refresh `updated_at`.
pub async fn update_customer<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    name: &str,
    name_kana: &str,
) -> Result<customer::Model, DbErr> {
    customer::ActiveModel {
        id: Unchanged(id),
        name: Set(name.to_string()),
        name_kana: Set(name_kana.to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .update(db)
    .await
}

pub async fn delete_customer<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), DbErr> {
    customer::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
