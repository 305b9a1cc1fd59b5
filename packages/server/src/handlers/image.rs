use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::StorageError;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::models::image::ImageUploadResponse;
use crate::models::media::MediaCategory;
use crate::models::shared::Envelope;
use crate::state::AppState;
use crate::store;
use crate::utils::media_key::{file_extension, legacy_image_key};

/// Body limit for legacy image uploads.
pub fn image_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(11 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/api/images/upload",
    tag = "Legacy Images",
    operation_id = "uploadImage",
    summary = "Upload a legacy single-slot image",
    description = "Superseded by the media collection, retained for backward compatibility. \
        Multipart fields: `record_id`, `type` (before|after), `file`. The storage key has a \
        fixed shape per slot, so a re-upload overwrites the prior blob. The record's \
        matching legacy field is updated, preserving the other slot; a missing record does \
        not fail the upload.",
    request_body(content_type = "multipart/form-data", description = "Image upload"),
    responses(
        (status = 201, description = "Image uploaded", body = ImageUploadResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut record_id: Option<String> = None;
    let mut slot_raw: Option<String> = None;
    let mut file: Option<(Option<String>, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("record_id") => {
                record_id = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read record_id: {e}"))
                })?);
            }
            Some("type") => {
                slot_raw = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read type: {e}"))
                })?);
            }
            Some("file") => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
                file = Some((filename, content_type, data));
            }
            _ => {}
        }
    }

    let (record_id, slot_raw, (filename, content_type, data)) = match (
        record_id.filter(|s| !s.is_empty()),
        slot_raw.filter(|s| !s.is_empty()),
        file,
    ) {
        (Some(r), Some(t), Some(f)) => (r, t, f),
        _ => {
            return Err(AppError::Validation(
                "record_id, type, and file are required".into(),
            ));
        }
    };

    let slot = MediaCategory::parse(&slot_raw)
        .ok_or_else(|| AppError::Validation("type must be \"before\" or \"after\"".into()))?;

    let record_id = Uuid::parse_str(&record_id)
        .map_err(|_| AppError::NotFound("Record not found".into()))?;

    let max_size = state.config.storage.max_photo_size;
    if data.len() as u64 > max_size {
        return Err(AppError::Validation(format!(
            "File size must be under {}MB",
            max_size / (1024 * 1024)
        )));
    }

    let ext = filename.as_deref().and_then(file_extension).unwrap_or("webp");
    let key = legacy_image_key(record_id, slot, ext);
    let mime_type = content_type
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image/webp".to_string());

    state.store.put(&key, &data, &mime_type).await?;

    // Update the matching legacy field, re-reading the row so the other slot
    // is preserved. A missing record does not fail the upload.
    if let Some(record) = store::record::get_record(&state.db, record_id).await? {
        let (before_key, after_key) = match slot {
            MediaCategory::Before => (key.as_str(), record.after_image_key.as_str()),
            MediaCategory::After => (record.before_image_key.as_str(), key.as_str()),
        };
        store::record::update_record_images(&state.db, record.id, before_key, after_key).await?;
    }

    Ok((
        StatusCode::CREATED,
        Envelope::ok(ImageUploadResponse { key }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/images/{key}",
    tag = "Legacy Images",
    operation_id = "getImage",
    summary = "Fetch a blob by its literal storage key",
    description = "The remainder of the path after `/api/images/` is the storage key. \
        Responds with the stored content type and an immutable far-future cache directive.",
    params(("key" = String, Path, description = "Storage key")),
    responses(
        (status = 200, description = "Blob content"),
        (status = 404, description = "Image not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(key))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    if key.is_empty() {
        return Err(AppError::Validation("Image key is required".into()));
    }

    let (reader, meta) = match state.store.get_stream(&key).await {
        Ok(pair) => pair,
        // A traversal attempt is indistinguishable from a missing object.
        Err(StorageError::NotFound(_)) | Err(StorageError::InvalidKey(_)) => {
            return Err(AppError::NotFound("Image not found".into()));
        }
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    let content_type = if meta.content_type.is_empty() {
        "image/webp".to_string()
    } else {
        meta.content_type
    };

    let body = Body::from_stream(ReaderStream::new(reader));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, meta.size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
