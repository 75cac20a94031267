use common::storage::{MAX_LIST_LIMIT, Metadata, ObjectInfo, PutOutcome};
use common::validation::{UploadError, check_thumbnail_upload, check_video_upload};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Query parameters for listing stored objects.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListObjectsQuery {
    /// Only keys starting with this prefix.
    #[param(example = "videos/")]
    pub prefix: Option<String>,
    /// Page size (default 50, max 1000).
    #[param(example = 50, minimum = 1, maximum = 1000)]
    pub limit: Option<usize>,
    /// Token from a previous truncated page.
    pub continuation_token: Option<String>,
}

impl ListObjectsQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ObjectListResponse {
    pub objects: Vec<ObjectInfo>,
    pub total_count: usize,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

/// Query parameter naming a single object.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ObjectKeyQuery {
    #[param(example = "videos/1718000000000-episode-1.mp4")]
    pub key: Option<String>,
}

impl ObjectKeyQuery {
    pub fn require(self) -> Result<String, AppError> {
        self.key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Missing key parameter".into()))
    }
}

/// Request body for uploading an object through the API.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UploadObjectRequest {
    #[schema(example = "thumbnails/episode-1.jpg")]
    pub key: String,
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    /// Object body, base64 encoded.
    pub data: String,
    /// Stored as user metadata on the object.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Metadata,
}

pub fn validate_upload_request(payload: &UploadObjectRequest) -> Result<(), AppError> {
    if payload.key.trim().is_empty() {
        return Err(AppError::Validation("Key must not be empty".into()));
    }
    if payload.content_type.trim().is_empty() {
        return Err(AppError::Validation("Content type must not be empty".into()));
    }
    if payload.data.is_empty() {
        return Err(AppError::Validation("Data must not be empty".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteObjectResponse {
    pub key: String,
    #[schema(example = "Successfully deleted videos/a.mp4")]
    pub message: String,
}

/// Request body for a presigned upload URL.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UploadUrlRequest {
    #[schema(example = "Episode 1.mp4")]
    pub filename: String,
    #[schema(example = "video/mp4")]
    pub content_type: String,
    /// Target folder (default `videos`).
    #[serde(default = "default_folder")]
    #[schema(example = "videos")]
    pub folder: String,
    /// Size in bytes, checked against the upload limits when given.
    pub file_size: Option<u64>,
}

fn default_folder() -> String {
    "videos".into()
}

/// Per-folder upload rules: `videos` takes `video/*` up to 2 GiB, `thumbnails` takes `image/*`.
pub fn check_upload_kind(
    folder: &str,
    content_type: &str,
    file_size: Option<u64>,
) -> Result<(), UploadError> {
    match (folder, file_size) {
        ("videos", Some(size)) => check_video_upload(content_type, size),
        ("videos", None) if !content_type.starts_with("video/") => Err(UploadError::NotAVideo),
        ("thumbnails", Some(size)) => check_thumbnail_upload(content_type, size),
        ("thumbnails", None) if !content_type.starts_with("image/") => {
            Err(UploadError::NotAnImage)
        }
        _ => Ok(()),
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadUrlResponse {
    /// Presigned `PUT` URL.
    pub upload_url: String,
    /// Where the object will be readable once uploaded.
    pub public_url: String,
    #[schema(example = "videos/1718000000000-episode-1.mp4")]
    pub key: String,
    pub expires_in: u32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadObjectResponse {
    #[serde(flatten)]
    pub outcome: PutOutcome,
    pub size: u64,
}
