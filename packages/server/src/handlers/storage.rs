use axum::extract::State;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::storage::ObjectMetadata;
use common::validation::{content_type_for_key, object_key, sanitize_upload_filename};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::handlers::ApiResult;
use crate::models::shared::ApiResponse;
use crate::models::storage::{
    DeleteObjectResponse, ListObjectsQuery, ObjectKeyQuery, ObjectListResponse,
    UploadObjectRequest, UploadObjectResponse, UploadUrlRequest, UploadUrlResponse,
    check_upload_kind, validate_upload_request,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/storage/objects",
    tag = "Storage",
    operation_id = "listObjects",
    summary = "List stored objects",
    description = "Lists objects in key order, one page at a time. Pass `next_continuation_token` back as `continuation_token` to read the next page.",
    params(ListObjectsQuery),
    responses(
        (status = 200, description = "Page of objects", body = ApiResponse<ObjectListResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, query), fields(prefix = ?query.prefix))]
pub async fn list_objects(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListObjectsQuery>,
) -> ApiResult<ObjectListResponse> {
    let page = state
        .storage
        .list(
            query.prefix.as_deref().filter(|p| !p.is_empty()),
            query.limit(),
            query.continuation_token.as_deref(),
        )
        .await?;

    let objects = page
        .objects
        .into_iter()
        .map(|mut object| {
            if object.content_type.is_none() {
                object.content_type = Some(content_type_for_key(&object.key));
            }
            object
        })
        .collect();

    Ok(ApiResponse::ok(ObjectListResponse {
        objects,
        total_count: page.key_count,
        is_truncated: page.is_truncated,
        next_continuation_token: page.next_continuation_token,
    }))
}

#[utoipa::path(
    post,
    path = "/storage/objects",
    tag = "Storage",
    operation_id = "uploadObject",
    summary = "Upload an object",
    description = "Stores a base64-encoded body under `key`, publicly readable, with the given user metadata. Large media should use a presigned upload URL instead.",
    request_body = UploadObjectRequest,
    responses(
        (status = 200, description = "Object stored", body = ApiResponse<UploadObjectResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(admin, state, payload), fields(key = %payload.key))]
pub async fn upload_object(
    admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadObjectRequest>,
) -> ApiResult<UploadObjectResponse> {
    validate_upload_request(&payload)?;

    let data = STANDARD
        .decode(payload.data.trim())
        .map_err(|e| AppError::Validation(format!("Data is not valid base64: {e}")))?;

    let size = data.len() as u64;
    let limit = state.config.storage.max_upload_size;
    if size > limit {
        return Err(AppError::Validation(format!(
            "Object is {size} bytes; the upload limit is {limit} bytes"
        )));
    }

    let outcome = state
        .storage
        .put(
            payload.key.trim(),
            data,
            payload.content_type.trim(),
            &payload.metadata,
        )
        .await?;

    tracing::info!(key = %outcome.key, size, by = %admin.email, "Object uploaded");
    Ok(ApiResponse::ok(UploadObjectResponse { outcome, size }))
}

#[utoipa::path(
    get,
    path = "/storage/objects/metadata",
    tag = "Storage",
    operation_id = "getObjectMetadata",
    summary = "Object metadata",
    params(ObjectKeyQuery),
    responses(
        (status = 200, description = "Object metadata", body = ApiResponse<ObjectMetadata>),
        (status = 400, description = "Missing or invalid key (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Object not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, query))]
pub async fn object_metadata(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ObjectKeyQuery>,
) -> ApiResult<ObjectMetadata> {
    let key = query.require()?;
    let metadata = state.storage.head(&key).await?;
    Ok(ApiResponse::ok(metadata))
}

#[utoipa::path(
    delete,
    path = "/storage/objects",
    tag = "Storage",
    operation_id = "deleteObject",
    summary = "Delete an object",
    description = "Deletes the object at `key`. Deleting a key that does not exist succeeds.",
    params(ObjectKeyQuery),
    responses(
        (status = 200, description = "Object deleted", body = ApiResponse<DeleteObjectResponse>),
        (status = 400, description = "Missing or invalid key (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(admin, state, query))]
pub async fn delete_object(
    admin: AdminUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ObjectKeyQuery>,
) -> ApiResult<DeleteObjectResponse> {
    let key = query.require()?;
    state.storage.delete(&key).await?;

    tracing::info!(key = %key, by = %admin.email, "Object deleted");
    Ok(ApiResponse::ok(DeleteObjectResponse {
        message: format!("Successfully deleted {key}"),
        key,
    }))
}

#[utoipa::path(
    post,
    path = "/storage/upload-url",
    tag = "Storage",
    operation_id = "createUploadUrl",
    summary = "Presigned upload URL",
    description = "Returns a time-limited URL the client can `PUT` the file to directly. The key is `{folder}/{timestamp}-{filename}` with the filename sanitised.",
    request_body = UploadUrlRequest,
    responses(
        (status = 200, description = "Upload URL", body = ApiResponse<UploadUrlResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 501, description = "Backend cannot presign (NOT_SUPPORTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, payload), fields(filename = %payload.filename))]
pub async fn create_upload_url(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadUrlRequest>,
) -> ApiResult<UploadUrlResponse> {
    if payload.filename.trim().is_empty() || payload.content_type.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing required fields: filename, content_type".into(),
        ));
    }
    let folder = payload.folder.trim().trim_matches('/');
    check_upload_kind(folder, &payload.content_type, payload.file_size)?;

    let filename = sanitize_upload_filename(&payload.filename)?;
    let key = object_key(folder, chrono::Utc::now().timestamp_millis(), &filename);
    let expires_in = state.config.storage.presign_expiry_secs;

    let upload_url = state
        .storage
        .presign_upload(&key, &payload.content_type, expires_in)
        .await?;

    Ok(ApiResponse::ok(UploadUrlResponse {
        upload_url,
        public_url: state.storage.public_url(&key),
        key,
        expires_in,
    }))
}
