use axum::{
    Json,
    extract::{DefaultBodyLimit, Multipart, Query, State, multipart::Field},
    http::StatusCode,
    response::IntoResponse,
};
use chatlog_common::LogPayload;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::record_id::RecordId;
use crate::models::record::{
    CreateRecordRequest, RecordListQuery, RecordListResponse, RecordResponse,
};
use crate::service::ImageUpload;
use crate::state::AppState;
use crate::store::NewChatRecord;

pub fn image_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(20 * 1024 * 1024) // 20 MB
}

#[utoipa::path(
    get,
    path = "/record/{id}",
    tag = "Chat Records",
    operation_id = "getChatRecord",
    summary = "Get a chat record by ID",
    description = "Returns the record with image references in `log_data` resolved to URLs. \
        URLs are written to `log_data.image_urls.<name>_image_url`; when exactly one image is \
        referenced it is also written to `log_data.image_url`. An image whose URL cannot be \
        issued gets an empty string rather than failing the request.",
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Enriched record", body = RecordResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Request cancelled (CANCELLED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_record(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<RecordResponse>, AppError> {
    let cancel = state.shutdown.child_token();
    let record = state.records.get_record(id, &cancel).await?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    get,
    path = "/records",
    tag = "Chat Records",
    operation_id = "listChatRecords",
    summary = "List chat records",
    description = "Returns records newest first. `limit` defaults to 50 and is capped at 100; \
        a missing, malformed or non-positive value falls back to 50. `offset` defaults to 0; \
        a malformed or negative value falls back to 0. Listed records are not enriched.",
    params(RecordListQuery),
    responses(
        (status = 200, description = "Page of records", body = RecordListResponse),
        (status = 503, description = "Request cancelled (CANCELLED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<RecordListResponse>, AppError> {
    let page = query.page();
    let cancel = state.shutdown.child_token();
    let (data, total) = state.records.list_records(page, &cancel).await?;

    Ok(Json(RecordListResponse {
        success: true,
        count: data.len(),
        data,
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

#[utoipa::path(
    post,
    path = "/records",
    tag = "Chat Records",
    operation_id = "createChatRecord",
    summary = "Log a chat interaction",
    description = "Stores a new record. `user_id` and `conversation_id` must be non-blank; \
        `log_data` defaults to an empty object and is stored verbatim.",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, body))]
pub async fn create_record(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateRecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cancel = state.shutdown.child_token();
    let record = state.records.create_record(body.into(), None, &cancel).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))))
}

#[utoipa::path(
    post,
    path = "/records/upload",
    tag = "Chat Records",
    operation_id = "createChatRecordWithImage",
    summary = "Log a chat interaction with an image",
    description = "Multipart variant of record creation. Text fields `user_id`, \
        `conversation_id`, optional `session_id` and optional `log_data` (a JSON object). \
        An optional `image` file is uploaded to the default bucket as \
        `{user_id}/{session_id}/{uuid}{ext}` and referenced from `log_data.image_ref`, \
        replacing any reference already there. Nothing is stored if the upload fails.",
    request_body(content_type = "multipart/form-data", description = "Record fields with optional image"),
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Image upload failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_record_with_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut record = NewChatRecord {
        user_id: String::new(),
        conversation_id: String::new(),
        session_id: None,
        log_data: LogPayload::new(),
    };
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("user_id") => record.user_id = text(field).await?,
            Some("conversation_id") => record.conversation_id = text(field).await?,
            Some("session_id") => record.session_id = Some(text(field).await?),
            Some("log_data") => record.log_data = log_data(&text(field).await?)?,
            Some("image") => {
                let filename = field.file_name().map(|s| s.to_string()).ok_or_else(|| {
                    AppError::Validation("Image field must have a filename".into())
                })?;
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                image = Some(ImageUpload {
                    filename,
                    content: content.to_vec(),
                });
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let cancel = state.shutdown.child_token();
    let record = state.records.create_record(record, image, &cancel).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))))
}

async fn text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

/// Blank text means an empty payload; anything else must be a JSON object.
fn log_data(raw: &str) -> Result<LogPayload, AppError> {
    if raw.trim().is_empty() {
        return Ok(LogPayload::new());
    }
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("Invalid log_data: {e}")))?;
    LogPayload::try_from(value)
        .map_err(|e| AppError::Validation(format!("Invalid log_data: {e}")))
}
