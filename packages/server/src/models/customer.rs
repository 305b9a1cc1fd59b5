use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCustomerRequest {
    /// Display name. Required, non-empty after trimming.
    pub name: Option<String>,
    /// Phonetic reading. Defaults to an empty string.
    pub name_kana: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub name_kana: Option<String>,
}

/// A customer row with the aggregates computed on every read.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub name_kana: String,
    /// Count of treatment records owned by this customer.
    #[schema(example = 3)]
    pub record_count: i64,
    /// Most recent treatment date among owned records, or null.
    #[schema(example = "2026-08-29")]
    pub latest_treatment_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CustomerListQuery {
    /// Substring filter matched against name or phonetic reading.
    pub search: Option<String>,
}
