use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use common::playback::PlaybackPlan;
use common::seo::{self, SeoSuggestion};
use common::video::{validate_draft, validate_patch};
use common::{CatalogError, ListQuery, Video, VideoDraft, VideoPatch};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::handlers::ApiResult;
use crate::models::shared::ApiResponse;
use crate::models::videos::{
    RelatedQuery, SeoRequest, VideoDetail, VideoListQuery, VideoListResponse, ViewCountResponse,
};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Video not found".into())
}

#[utoipa::path(
    get,
    path = "/videos",
    tag = "Videos",
    operation_id = "listVideos",
    summary = "List videos",
    description = "Returns a page of videos, optionally filtered by category and featured flag. Sorted by `created_at` descending unless `sort_by`/`sort_order` say otherwise.",
    params(VideoListQuery),
    responses(
        (status = 200, description = "Page of videos", body = ApiResponse<VideoListResponse>),
        (status = 400, description = "Unknown sort field or order (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_videos(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<VideoListQuery>,
) -> ApiResult<VideoListResponse> {
    let query = ListQuery::try_from(query)?;
    let catalog = state.catalog.read().await;
    let page = catalog.list(&query);

    Ok(ApiResponse::ok(VideoListResponse {
        videos: page.items.into_iter().cloned().collect(),
        pagination: page.pagination,
    }))
}

#[utoipa::path(
    post,
    path = "/videos",
    tag = "Videos",
    operation_id = "createVideo",
    summary = "Create a video",
    description = "Adds a video to the catalog. A missing thumbnail is derived from the video URL.",
    request_body = VideoDraft,
    responses(
        (status = 201, description = "Video created", body = ApiResponse<Video>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, admin, draft), fields(title = %draft.title))]
pub async fn create_video(
    admin: AdminUser,
    State(state): State<AppState>,
    AppJson(mut draft): AppJson<VideoDraft>,
) -> Result<(StatusCode, axum::Json<ApiResponse<Video>>), AppError> {
    validate_draft(&draft)?;

    if draft.thumbnail_url.trim().is_empty() {
        draft.thumbnail_url = common::format::thumbnail_url_for(draft.video_url.trim());
    }

    let video = Video::from_draft(Uuid::now_v7().to_string(), draft, chrono::Utc::now());
    let created = state
        .catalog
        .mutate(move |catalog| catalog.insert(video).cloned())
        .await?;

    tracing::info!(id = %created.id, by = %admin.email, "Video created");
    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

#[utoipa::path(
    get,
    path = "/videos/featured",
    tag = "Videos",
    operation_id = "listFeaturedVideos",
    summary = "Featured videos",
    description = "Returns every video flagged as featured, in catalog order.",
    responses(
        (status = 200, description = "Featured videos", body = ApiResponse<Vec<Video>>),
    ),
)]
#[instrument(skip(state))]
pub async fn featured_videos(State(state): State<AppState>) -> ApiResult<Vec<Video>> {
    let catalog = state.catalog.read().await;
    Ok(ApiResponse::ok(catalog.featured().cloned().collect()))
}

#[utoipa::path(
    post,
    path = "/videos/seo",
    tag = "Videos",
    operation_id = "generateSeo",
    summary = "Suggest SEO content",
    description = "Builds an SEO description and up to ten keywords from a title, description and category.",
    request_body = SeoRequest,
    responses(
        (status = 200, description = "Suggestion", body = ApiResponse<SeoSuggestion>),
        (status = 400, description = "Title or description missing (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, payload))]
pub async fn generate_seo(
    _admin: AdminUser,
    AppJson(payload): AppJson<SeoRequest>,
) -> ApiResult<SeoSuggestion> {
    let suggestion = seo::generate(&payload.title, &payload.description, &payload.category_id)?;
    Ok(ApiResponse::ok(suggestion))
}

#[utoipa::path(
    get,
    path = "/videos/{id}",
    tag = "Videos",
    operation_id = "getVideo",
    summary = "Get a video",
    description = "Returns one video with formatted duration and view count and its category.",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video details", body = ApiResponse<VideoDetail>),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<VideoDetail> {
    let catalog = state.catalog.read().await;
    let video = catalog.video(&id).ok_or_else(not_found)?;
    let category = catalog.category(&video.category_id).cloned();
    Ok(ApiResponse::ok(VideoDetail::new(video.clone(), category)))
}

#[utoipa::path(
    patch,
    path = "/videos/{id}",
    tag = "Videos",
    operation_id = "updateVideo",
    summary = "Update a video",
    description = "Applies the fields present in the body. Absent fields keep their value.",
    params(("id" = String, Path, description = "Video ID")),
    request_body = VideoPatch,
    responses(
        (status = 200, description = "Updated video", body = ApiResponse<Video>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, admin, patch))]
pub async fn update_video(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<VideoPatch>,
) -> ApiResult<Video> {
    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".into()));
    }
    validate_patch(&patch)?;

    let now = chrono::Utc::now();
    let updated = state
        .catalog
        .mutate(|catalog| catalog.update(&id, patch, now).cloned())
        .await?;

    tracing::info!(id = %updated.id, by = %admin.email, "Video updated");
    Ok(ApiResponse::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/videos/{id}",
    tag = "Videos",
    operation_id = "deleteVideo",
    summary = "Delete a video",
    description = "Removes the video from the catalog and returns it. Stored media is left in place.",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Deleted video", body = ApiResponse<Video>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, admin))]
pub async fn delete_video(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Video> {
    let removed = state.catalog.mutate(|catalog| catalog.remove(&id)).await?;
    tracing::info!(id = %removed.id, by = %admin.email, "Video deleted");
    Ok(ApiResponse::ok(removed))
}

#[utoipa::path(
    get,
    path = "/videos/{id}/related",
    tag = "Videos",
    operation_id = "listRelatedVideos",
    summary = "Related videos",
    description = "Other videos from the same category, in catalog order.",
    params(("id" = String, Path, description = "Video ID"), RelatedQuery),
    responses(
        (status = 200, description = "Related videos", body = ApiResponse<Vec<Video>>),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn related_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<RelatedQuery>,
) -> ApiResult<Vec<Video>> {
    let catalog = state.catalog.read().await;
    let video = catalog.video(&id).ok_or_else(not_found)?;
    let related = catalog
        .related(video, query.limit())
        .into_iter()
        .cloned()
        .collect();
    Ok(ApiResponse::ok(related))
}

#[utoipa::path(
    post,
    path = "/videos/{id}/views",
    tag = "Videos",
    operation_id = "recordView",
    summary = "Record a view",
    description = "Increments the view counter. Players call this once a session has played long enough to count.",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "New view count", body = ApiResponse<ViewCountResponse>),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ViewCountResponse> {
    let view_count = state
        .catalog
        .mutate(|catalog| {
            catalog
                .increment_views(&id)
                .ok_or_else(|| CatalogError::VideoNotFound(id.clone()))
        })
        .await?;

    Ok(ApiResponse::ok(ViewCountResponse { id, view_count }))
}

#[utoipa::path(
    get,
    path = "/videos/{id}/playback",
    tag = "Videos",
    operation_id = "getPlaybackPlan",
    summary = "Playback plan",
    description = "Everything a player needs for one session: media URLs, the commercial pool and the window (5-10% of the duration) in which one commercial may start.",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Playback plan", body = ApiResponse<PlaybackPlan>),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn playback_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PlaybackPlan> {
    let catalog = state.catalog.read().await;
    let video = catalog.video(&id).ok_or_else(not_found)?;
    Ok(ApiResponse::ok(PlaybackPlan::new(video, &catalog.commercials)))
}
