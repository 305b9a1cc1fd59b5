use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::future::try_join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::record::{
    CreateRecordRequest, RecordDetailResponse, RecordListQuery, RecordResponse,
    UpdateRecordRequest,
};
use crate::models::shared::{DeletedResponse, Envelope};
use crate::state::AppState;
use crate::store;
use crate::utils::representative::resolve_display_key;

fn parse_record_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Record not found".into()))
}

#[utoipa::path(
    get,
    path = "/api/records",
    tag = "Records",
    operation_id = "listRecords",
    summary = "List treatment records for a customer",
    description = "Requires `customer_id`. Records are ordered by treatment date descending, \
        ties broken by creation time descending.",
    params(RecordListQuery),
    responses(
        (status = 200, description = "Record list", body = [RecordResponse]),
        (status = 400, description = "customer_id missing", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<Envelope<Vec<RecordResponse>>>, AppError> {
    let customer_id = query
        .customer_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("customer_id is required".into()))?;

    // An unknown or malformed customer id simply has no records.
    let Ok(customer_id) = Uuid::parse_str(customer_id) else {
        return Ok(Envelope::ok(Vec::new()));
    };

    let records = store::record::list_records(&state.db, customer_id).await?;
    Ok(Envelope::ok(
        records.into_iter().map(RecordResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/records/{id}",
    tag = "Records",
    operation_id = "getRecord",
    summary = "Get a treatment record by id",
    description = "Includes the resolved before/after display keys: the representative media \
        item's storage key when set and present, otherwise the legacy image key.",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record detail", body = RecordDetailResponse),
        (status = 404, description = "Record not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<RecordDetailResponse>>, AppError> {
    let id = parse_record_id(&id)?;
    let record = store::record::get_record(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))?;

    let media = store::media::list_media(&state.db, id).await?;
    let before_display_key =
        resolve_display_key(record.before_media_id, &record.before_image_key, &media)
            .map(str::to_string);
    let after_display_key =
        resolve_display_key(record.after_media_id, &record.after_image_key, &media)
            .map(str::to_string);

    Ok(Envelope::ok(RecordDetailResponse {
        record: RecordResponse::from(record),
        before_display_key,
        after_display_key,
    }))
}

#[utoipa::path(
    post,
    path = "/api/records",
    tag = "Records",
    operation_id = "createRecord",
    summary = "Create a treatment record",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Customer not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_record(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer_id = payload
        .customer_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("customer_id is required".into()))?;
    let treatment_date = payload
        .treatment_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("treatment_date is required".into()))?;

    // The owning customer must exist at creation time.
    let customer_id = Uuid::parse_str(customer_id)
        .map_err(|_| AppError::NotFound("Customer not found".into()))?;
    store::customer::get_customer(&state.db, customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    let memo = payload.memo.as_deref().map(str::trim).unwrap_or("");
    let before_image_key = payload.before_image_key.as_deref().unwrap_or("");
    let after_image_key = payload.after_image_key.as_deref().unwrap_or("");

    let model = store::record::insert_record(
        &state.db,
        customer_id,
        treatment_date,
        memo,
        before_image_key,
        after_image_key,
    )
    .await?;

    Ok((StatusCode::CREATED, Envelope::ok(RecordResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/api/records/{id}",
    tag = "Records",
    operation_id = "updateRecord",
    summary = "Partially update a treatment record",
    description = "Read-modify-write of date and memo: supplied fields overwrite, omitted \
        fields keep their prior values. Concurrent updates are last-writer-wins.",
    params(("id" = String, Path, description = "Record id")),
    request_body = UpdateRecordRequest,
    responses(
        (status = 200, description = "Record updated", body = RecordResponse),
        (status = 404, description = "Record not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateRecordRequest>,
) -> Result<Json<Envelope<RecordResponse>>, AppError> {
    let id = parse_record_id(&id)?;
    let existing = store::record::get_record(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))?;

    let treatment_date = payload
        .treatment_date
        .unwrap_or_else(|| existing.treatment_date.clone());
    let memo = payload
        .memo
        .as_deref()
        .map(str::trim)
        .map(str::to_string)
        .unwrap_or_else(|| existing.memo.clone());

    let updated = store::record::update_record(&state.db, id, &treatment_date, &memo).await?;
    Ok(Envelope::ok(RecordResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/records/{id}",
    tag = "Records",
    operation_id = "deleteRecord",
    summary = "Delete a treatment record and its media",
    description = "Sweeps the record's legacy image blobs and every owned media blob from \
        the object store (concurrently), then deletes the media rows and the record row. \
        A blob-sweep failure surfaces as 500 with the relational deletes un-run.",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record deleted", body = DeletedResponse),
        (status = 404, description = "Record not found", body = ErrorBody),
        (status = 500, description = "Blob sweep failed", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<DeletedResponse>>, AppError> {
    let id = parse_record_id(&id)?;
    let existing = store::record::get_record(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))?;

    let mut keys: Vec<String> = Vec::new();
    if !existing.before_image_key.is_empty() {
        keys.push(existing.before_image_key.clone());
    }
    if !existing.after_image_key.is_empty() {
        keys.push(existing.after_image_key.clone());
    }
    for item in store::media::list_media(&state.db, id).await? {
        if !item.storage_key.is_empty() {
            keys.push(item.storage_key);
        }
    }

    // All blob deletes must be attempted before the relational deletes run.
    try_join_all(keys.iter().map(|key| state.store.delete(key))).await?;

    store::media::delete_media_by_record(&state.db, id).await?;
    store::record::delete_record(&state.db, id).await?;

    Ok(Envelope::ok(DeletedResponse { id }))
}
