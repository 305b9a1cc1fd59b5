use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::treatment_record;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRecordRequest {
    /// Owning customer id. Must reference an existing customer.
    pub customer_id: Option<String>,
    /// Treatment date string (e.g. `2026-08-29`). Required.
    pub treatment_date: Option<String>,
    /// Free-text memo. Defaults to an empty string.
    pub memo: Option<String>,
    /// Legacy single-slot image keys, settable at creation for
    /// migration-compatibility. Default to empty strings.
    pub before_image_key: Option<String>,
    pub after_image_key: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateRecordRequest {
    pub treatment_date: Option<String>,
    pub memo: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetRepresentativeRequest {
    /// `before_media_id` or `after_media_id`.
    pub field: Option<String>,
    /// Media id to set, or an empty string to clear the slot.
    #[serde(default)]
    pub media_id: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RepresentativeResponse {
    #[schema(example = "before_media_id")]
    pub field: String,
    /// The committed media id, or an empty string after a clear.
    pub media_id: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecordResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "2026-08-29")]
    pub treatment_date: String,
    pub memo: String,
    /// Legacy image keys; empty string means unset.
    pub before_image_key: String,
    pub after_image_key: String,
    /// Representative media references; empty string means unset.
    pub before_media_id: String,
    pub after_media_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<treatment_record::Model> for RecordResponse {
    fn from(model: treatment_record::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            treatment_date: model.treatment_date,
            memo: model.memo,
            before_image_key: model.before_image_key,
            after_image_key: model.after_image_key,
            before_media_id: uuid_or_empty(model.before_media_id),
            after_media_id: uuid_or_empty(model.after_media_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Record detail including the resolved before/after display keys, the
/// compatibility bridge between the legacy single-image fields and the media
/// collection.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RecordDetailResponse {
    #[serde(flatten)]
    pub record: RecordResponse,
    /// Storage key of the representative before-photo, falling back to the
    /// legacy key; null when neither is set.
    pub before_display_key: Option<String>,
    pub after_display_key: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct RecordListQuery {
    /// Required: the owning customer id.
    pub customer_id: Option<String>,
}

fn uuid_or_empty(id: Option<Uuid>) -> String {
    id.map(|u| u.to_string()).unwrap_or_default()
}
