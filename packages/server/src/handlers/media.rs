use axum::Json;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::media::{MediaCategory, MediaResponse, MediaType, RepresentativeField};
use crate::models::record::{RepresentativeResponse, SetRepresentativeRequest};
use crate::models::shared::{DeletedResponse, Envelope};
use crate::state::AppState;
use crate::store;
use crate::utils::media_key::{file_extension, media_storage_key};

/// Body limit for media uploads; the per-type ceilings are enforced in the
/// handler, this only bounds the multipart body itself.
pub fn media_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(110 * 1024 * 1024)
}

struct UploadedFile {
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

#[utoipa::path(
    post,
    path = "/api/media/upload",
    tag = "Media",
    operation_id = "uploadMedia",
    summary = "Upload a photo or video to a record",
    description = "Multipart fields: `record_id`, `media_type` (photo|video), optional \
        `category` (before|after, validated and otherwise ignored), `file`. Enforces the \
        per-type size ceiling and the per-record count ceiling. The count check is \
        check-then-act, so concurrent uploads can transiently exceed the ceiling.",
    request_body(content_type = "multipart/form-data", description = "Media upload"),
    responses(
        (status = 201, description = "Media created", body = MediaResponse),
        (status = 400, description = "Validation error or ceiling exceeded", body = ErrorBody),
        (status = 404, description = "Record not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut record_id: Option<String> = None;
    let mut media_type_raw: Option<String> = None;
    let mut category_raw: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("record_id") => record_id = Some(read_text(field, "record_id").await?),
            Some("media_type") => media_type_raw = Some(read_text(field, "media_type").await?),
            Some("category") => category_raw = Some(read_text(field, "category").await?),
            Some("file") => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (record_id, media_type_raw, file) = match (
        record_id.filter(|s| !s.is_empty()),
        media_type_raw.filter(|s| !s.is_empty()),
        file,
    ) {
        (Some(r), Some(m), Some(f)) => (r, m, f),
        _ => {
            return Err(AppError::Validation(
                "record_id, media_type, and file are required".into(),
            ));
        }
    };

    let media_type = MediaType::parse(&media_type_raw).ok_or_else(|| {
        AppError::Validation("media_type must be \"photo\" or \"video\"".into())
    })?;
    if let Some(category) = category_raw.as_deref().filter(|s| !s.is_empty())
        && MediaCategory::parse(category).is_none()
    {
        return Err(AppError::Validation(
            "category must be \"before\" or \"after\"".into(),
        ));
    }

    let record_id = Uuid::parse_str(&record_id)
        .map_err(|_| AppError::NotFound("Record not found".into()))?;
    store::record::get_record(&state.db, record_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))?;

    let max_size = match media_type {
        MediaType::Photo => state.config.storage.max_photo_size,
        MediaType::Video => state.config.storage.max_video_size,
    };
    if file.data.len() as u64 > max_size {
        let limit_mb = max_size / (1024 * 1024);
        return Err(AppError::Validation(format!(
            "ファイルサイズは{limit_mb}MB以下にしてください"
        )));
    }

    let max_count = match media_type {
        MediaType::Photo => state.config.storage.max_photos_per_record,
        MediaType::Video => state.config.storage.max_videos_per_record,
    };
    // Check-then-act: not atomic with the insert below, a concurrent upload
    // to the same record/type can transiently exceed the ceiling.
    let current_count = store::media::count_media(&state.db, record_id, media_type).await?;
    if current_count >= max_count {
        return Err(AppError::Validation(format!(
            "{}は{max_count}枚までアップロード可能です",
            media_type.label()
        )));
    }

    let media_id = Uuid::now_v7();
    let ext = file
        .filename
        .as_deref()
        .and_then(file_extension)
        .unwrap_or(media_type.default_extension());
    let storage_key = media_storage_key(record_id, media_id, ext);
    let mime_type = resolve_content_type(
        file.content_type.as_deref(),
        file.filename.as_deref(),
        media_type.default_mime(),
    );

    state.store.put(&storage_key, &file.data, &mime_type).await?;

    let model = store::media::insert_media(
        &state.db,
        media_id,
        record_id,
        media_type,
        current_count as i32,
        &storage_key,
        file.data.len() as i64,
        &mime_type,
    )
    .await?;

    Ok((StatusCode::CREATED, Envelope::ok(MediaResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/media/{record_id}",
    tag = "Media",
    operation_id = "listMedia",
    summary = "List media for a record",
    description = "Ordered by `(sort_order, created_at)` ascending.",
    params(("record_id" = String, Path, description = "Record id")),
    responses((status = 200, description = "Media list", body = [MediaResponse])),
)]
#[instrument(skip(state), fields(record_id))]
pub async fn list_media(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<Json<Envelope<Vec<MediaResponse>>>, AppError> {
    // An unknown or malformed record id simply has no media.
    let Ok(record_id) = Uuid::parse_str(&record_id) else {
        return Ok(Envelope::ok(Vec::new()));
    };

    let media = store::media::list_media(&state.db, record_id).await?;
    Ok(Envelope::ok(
        media.into_iter().map(MediaResponse::from).collect(),
    ))
}

#[utoipa::path(
    put,
    path = "/api/media/{record_id}/representative",
    tag = "Media",
    operation_id = "setRepresentative",
    summary = "Set or clear a record's representative media",
    description = "`field` selects the before/after slot. An empty `media_id` clears the \
        slot; otherwise the media must exist and be a photo. Videos are rejected.",
    params(("record_id" = String, Path, description = "Record id")),
    request_body = SetRepresentativeRequest,
    responses(
        (status = 200, description = "Representative committed", body = RepresentativeResponse),
        (status = 400, description = "Invalid field or media is a video", body = ErrorBody),
        (status = 404, description = "Record or media not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(record_id))]
pub async fn set_representative(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    AppJson(payload): AppJson<SetRepresentativeRequest>,
) -> Result<Json<Envelope<RepresentativeResponse>>, AppError> {
    let field = payload
        .field
        .as_deref()
        .and_then(RepresentativeField::parse)
        .ok_or_else(|| {
            AppError::Validation(
                "field must be \"before_media_id\" or \"after_media_id\"".into(),
            )
        })?;

    let record_id = Uuid::parse_str(&record_id)
        .map_err(|_| AppError::NotFound("Record not found".into()))?;
    store::record::get_record(&state.db, record_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".into()))?;

    // Empty media id clears the slot; always allowed.
    if payload.media_id.is_empty() {
        store::record::update_record_representative(&state.db, record_id, field, None).await?;
        return Ok(Envelope::ok(RepresentativeResponse {
            field: field.as_str().to_string(),
            media_id: String::new(),
        }));
    }

    let media_id = Uuid::parse_str(&payload.media_id)
        .map_err(|_| AppError::NotFound("Media not found".into()))?;
    let media = store::media::get_media(&state.db, media_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".into()))?;

    if MediaType::parse(&media.media_type) != Some(MediaType::Photo) {
        return Err(AppError::Validation("代表写真には写真のみ設定可能です".into()));
    }

    store::record::update_record_representative(&state.db, record_id, field, Some(media_id))
        .await?;
    Ok(Envelope::ok(RepresentativeResponse {
        field: field.as_str().to_string(),
        media_id: payload.media_id,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/media/{id}/delete",
    tag = "Media",
    operation_id = "deleteMedia",
    summary = "Delete one media item",
    description = "Deletes the blob, blanks any representative reference to this media id \
        on its record, then deletes the row. The steps are sequenced best-effort, not \
        atomic.",
    params(("id" = String, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media deleted", body = DeletedResponse),
        (status = 404, description = "Media not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<DeletedResponse>>, AppError> {
    let id =
        Uuid::parse_str(&id).map_err(|_| AppError::NotFound("Media not found".into()))?;
    let media = store::media::get_media(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".into()))?;

    if !media.storage_key.is_empty() {
        state.store.delete(&media.storage_key).await?;
    }

    // The back-reference clear must not be skipped by the row deletion.
    store::record::clear_representative_by_media_id(&state.db, id).await?;
    store::media::delete_media(&state.db, id).await?;

    Ok(Envelope::ok(DeletedResponse { id }))
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

/// Content type for an upload: the part's own type, then a guess from the
/// filename, then the per-media-type default.
fn resolve_content_type(
    content_type: Option<&str>,
    filename: Option<&str>,
    fallback: &str,
) -> String {
    if let Some(ct) = content_type.filter(|s| !s.is_empty()) {
        return ct.to_string();
    }
    if let Some(name) = filename
        && let Some(guess) = mime_guess::from_path(name).first()
    {
        return guess.to_string();
    }
    fallback.to_string()
}
