use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::future::try_join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::customer::{
    CreateCustomerRequest, CustomerListQuery, CustomerResponse, UpdateCustomerRequest,
};
use crate::models::shared::{DeletedResponse, Envelope};
use crate::state::AppState;
use crate::store;

/// Treat an unparseable id like a missing row: the id space is opaque to
/// clients, so both cases are simply "not found".
fn parse_customer_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Customer not found".into()))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    operation_id = "listCustomers",
    summary = "List customers with record aggregates",
    description = "Returns all customers with their record count and latest treatment date, \
        newest-updated first. An optional `search` term filters by substring match on the \
        name or phonetic reading.",
    params(CustomerListQuery),
    responses(
        (status = 200, description = "Customer list", body = [CustomerResponse]),
        (status = 500, description = "Unexpected failure", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Envelope<Vec<CustomerResponse>>>, AppError> {
    let data = store::customer::list_customers(&state.db, query.search.as_deref()).await?;
    Ok(Envelope::ok(data))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    operation_id = "getCustomer",
    summary = "Get a customer by id",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer detail", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<CustomerResponse>>, AppError> {
    let id = parse_customer_id(&id)?;
    let customer = store::customer::get_customer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;
    Ok(Envelope::ok(customer))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    operation_id = "createCustomer",
    summary = "Create a customer",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_customer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    let name_kana = payload.name_kana.as_deref().map(str::trim).unwrap_or("");

    let model = store::customer::insert_customer(&state.db, name, name_kana).await?;

    // Respond with the re-fetched row so the aggregates are present.
    let customer = store::customer::get_customer(&state.db, model.id)
        .await?
        .ok_or_else(|| AppError::Internal("customer missing after insert".into()))?;
    Ok((StatusCode::CREATED, Envelope::ok(customer)))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    operation_id = "updateCustomer",
    summary = "Partially update a customer",
    description = "Read-modify-write: supplied fields overwrite, omitted fields keep their \
        prior values. Concurrent updates are last-writer-wins.",
    params(("id" = String, Path, description = "Customer id")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateCustomerRequest>,
) -> Result<Json<Envelope<CustomerResponse>>, AppError> {
    let id = parse_customer_id(&id)?;
    let existing = store::customer::get_customer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .map(str::to_string)
        .unwrap_or(existing.name);
    let name_kana = payload
        .name_kana
        .as_deref()
        .map(str::trim)
        .map(str::to_string)
        .unwrap_or(existing.name_kana);

    store::customer::update_customer(&state.db, id, &name, &name_kana).await?;

    let updated = store::customer::get_customer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::Internal("customer missing after update".into()))?;
    Ok(Envelope::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    operation_id = "deleteCustomer",
    summary = "Delete a customer and everything it owns",
    description = "Cascades to the customer's records and their media rows, and sweeps the \
        legacy and media blobs of every owned record from the object store. The sweep and \
        the relational deletes are sequenced best-effort, not transactional.",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted", body = DeletedResponse),
        (status = 404, description = "Customer not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<DeletedResponse>>, AppError> {
    let id = parse_customer_id(&id)?;
    store::customer::get_customer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    let records = store::record::list_records(&state.db, id).await?;

    let mut keys: Vec<String> = Vec::new();
    for record in &records {
        if !record.before_image_key.is_empty() {
            keys.push(record.before_image_key.clone());
        }
        if !record.after_image_key.is_empty() {
            keys.push(record.after_image_key.clone());
        }
        for item in store::media::list_media(&state.db, record.id).await? {
            if !item.storage_key.is_empty() {
                keys.push(item.storage_key);
            }
        }
    }

    // All blob deletes must be attempted before any relational delete runs.
    try_join_all(keys.iter().map(|key| state.store.delete(key))).await?;

    for record in &records {
        store::media::delete_media_by_record(&state.db, record.id).await?;
    }
    store::record::delete_records_by_customer(&state.db, id).await?;
    store::customer::delete_customer(&state.db, id).await?;

    Ok(Envelope::ok(DeletedResponse { id }))
}
