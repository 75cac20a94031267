use axum::extract::{Path, State};
use common::roku::{
    ChannelFeed, ChannelKind, FeedSettings, FeedUrl, RokuFeed, feed_key, feed_urls,
    generate_all_feeds, generate_channel_feed, generate_feed, validate_feed,
};
use common::storage::Metadata;
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::extractors::json::AppJson;
use crate::handlers::ApiResult;
use crate::models::roku::{
    ChannelFeedEntry, FeedDataRequest, FeedUploadResponse, FeedValidationResponse,
    PublishResponse, PublishedFeed, RemoteFeedResponse,
};
use crate::models::shared::ApiResponse;
use crate::state::AppState;

const GENERATED_BY: &str = "fechannel-admin";
const JSON_CONTENT_TYPE: &str = "application/json";

fn feed_settings(state: &AppState) -> FeedSettings {
    let roku = &state.config.roku;
    FeedSettings {
        provider_name: roku.provider_name.clone(),
        language: roku.language.clone(),
        site_origin: roku.site_origin.clone(),
    }
}

fn upload_metadata(total_videos: usize) -> Metadata {
    Metadata::from([
        ("generated-by".to_string(), GENERATED_BY.to_string()),
        ("generated-at".to_string(), chrono::Utc::now().to_rfc3339()),
        ("total-videos".to_string(), total_videos.to_string()),
    ])
}

fn channel_total(feed: &ChannelFeed) -> usize {
    feed.categories.iter().map(|c| c.videos.len()).sum()
}

fn require_feed_data(payload: FeedDataRequest) -> Result<Value, AppError> {
    match payload.feed_data {
        Value::Null => Err(AppError::Validation(
            "Missing feed_data in request body".into(),
        )),
        feed => Ok(feed),
    }
}

#[utoipa::path(
    get,
    path = "/roku/feed",
    tag = "Roku",
    operation_id = "getRokuFeed",
    summary = "Generated Roku feed",
    description = "Builds the channel feed from the catalog: every video as a movie and one series per non-empty category.",
    responses(
        (status = 200, description = "Roku feed", body = ApiResponse<RokuFeed>),
    ),
)]
#[instrument(skip(state))]
pub async fn roku_feed(State(state): State<AppState>) -> ApiResult<RokuFeed> {
    let settings = feed_settings(&state);
    let catalog = state.catalog.read().await;
    Ok(ApiResponse::ok(generate_feed(
        &catalog.videos,
        &catalog.categories,
        &settings,
        chrono::Utc::now(),
    )))
}

#[utoipa::path(
    get,
    path = "/roku/feeds",
    tag = "Roku",
    operation_id = "listChannelFeeds",
    summary = "All channel feeds",
    description = "One generated feed per network channel.",
    responses(
        (status = 200, description = "Channel feeds", body = ApiResponse<Vec<ChannelFeedEntry>>),
    ),
)]
#[instrument(skip(state))]
pub async fn channel_feeds(State(state): State<AppState>) -> ApiResult<Vec<ChannelFeedEntry>> {
    let catalog = state.catalog.read().await;
    let feeds = generate_all_feeds(&catalog.videos, chrono::Utc::now())
        .into_iter()
        .map(|(channel, feed)| ChannelFeedEntry {
            channel,
            label: channel.label(),
            feed,
        })
        .collect();
    Ok(ApiResponse::ok(feeds))
}

#[utoipa::path(
    get,
    path = "/roku/feeds/urls",
    tag = "Roku",
    operation_id = "listChannelFeedUrls",
    summary = "Channel feed URLs",
    description = "Where each published channel feed is served from, per the storage backend.",
    responses(
        (status = 200, description = "Labelled feed URLs", body = ApiResponse<Vec<FeedUrl>>),
    ),
)]
#[instrument(skip(state))]
pub async fn channel_feed_urls(State(state): State<AppState>) -> ApiResult<Vec<FeedUrl>> {
    Ok(ApiResponse::ok(feed_urls(|key| state.storage.public_url(key))))
}

#[utoipa::path(
    get,
    path = "/roku/feeds/{channel}",
    tag = "Roku",
    operation_id = "getChannelFeed",
    summary = "One channel feed",
    params(("channel" = ChannelKind, Path, description = "Channel name")),
    responses(
        (status = 200, description = "Channel feed", body = ApiResponse<ChannelFeed>),
        (status = 404, description = "Unknown channel (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn channel_feed(
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> ApiResult<ChannelFeed> {
    let kind = ChannelKind::parse(&channel)
        .ok_or_else(|| AppError::NotFound(format!("Unknown channel '{channel}'")))?;
    let catalog = state.catalog.read().await;
    Ok(ApiResponse::ok(generate_channel_feed(
        kind,
        &catalog.videos,
        chrono::Utc::now(),
    )))
}

#[utoipa::path(
    post,
    path = "/roku/feeds/publish",
    tag = "Roku",
    operation_id = "publishChannelFeeds",
    summary = "Publish channel feeds",
    description = "Generates every channel feed and stores it at `roku-feeds/{channel}.json`.",
    responses(
        (status = 200, description = "Published feeds", body = ApiResponse<PublishResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(admin, state))]
pub async fn publish_channel_feeds(
    admin: AdminUser,
    State(state): State<AppState>,
) -> ApiResult<PublishResponse> {
    let feeds = {
        let catalog = state.catalog.read().await;
        generate_all_feeds(&catalog.videos, chrono::Utc::now())
    };

    let mut published = Vec::with_capacity(feeds.len());
    for (channel, feed) in feeds {
        let key = feed_key(channel);
        let total_videos = channel_total(&feed);
        let body = serde_json::to_vec_pretty(&feed)
            .map_err(|e| AppError::Internal(format!("Feed encode error: {e}")))?;
        let outcome = state
            .storage
            .put(&key, body, JSON_CONTENT_TYPE, &upload_metadata(total_videos))
            .await?;
        published.push(PublishedFeed {
            channel,
            key: outcome.key,
            url: outcome.location,
            total_videos,
        });
    }

    tracing::info!(count = published.len(), by = %admin.email, "Channel feeds published");
    Ok(ApiResponse::ok(PublishResponse { published }))
}

#[utoipa::path(
    get,
    path = "/roku/remote",
    tag = "Roku",
    operation_id = "checkRemoteFeed",
    summary = "Validate the live feed",
    description = "Fetches the configured public feed and reports on its structure.",
    responses(
        (status = 200, description = "Remote feed and report", body = ApiResponse<RemoteFeedResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Feed could not be fetched (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state))]
pub async fn remote_feed(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> ApiResult<RemoteFeedResponse> {
    let url = state.config.roku.remote_feed_url.clone();

    let response = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to fetch feed: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "Failed to fetch feed: HTTP status {}",
            status.as_u16()
        )));
    }
    let feed: Value = response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Feed is not valid JSON: {e}")))?;

    let validation = validate_feed(&feed);
    Ok(ApiResponse::ok(RemoteFeedResponse {
        url,
        feed,
        validation,
    }))
}

#[utoipa::path(
    post,
    path = "/roku/validate",
    tag = "Roku",
    operation_id = "validateFeed",
    summary = "Validate a feed",
    description = "Checks a feed document for the fields Roku requires. Problems are reported in the body, not as an error status.",
    request_body = FeedDataRequest,
    responses(
        (status = 200, description = "Validation report", body = ApiResponse<FeedValidationResponse>),
        (status = 400, description = "No feed supplied (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, payload))]
pub async fn validate(
    _admin: AdminUser,
    AppJson(payload): AppJson<FeedDataRequest>,
) -> ApiResult<FeedValidationResponse> {
    let feed = require_feed_data(payload)?;
    Ok(ApiResponse::ok(FeedValidationResponse {
        validation: validate_feed(&feed),
    }))
}

#[utoipa::path(
    post,
    path = "/roku/upload",
    tag = "Roku",
    operation_id = "uploadFeed",
    summary = "Validate and publish a feed",
    description = "Stores the feed at the configured key when it validates. An invalid feed is rejected with its errors.",
    request_body = FeedDataRequest,
    responses(
        (status = 200, description = "Feed stored", body = ApiResponse<FeedUploadResponse>),
        (status = 400, description = "Missing or invalid feed (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(admin, state, payload))]
pub async fn upload(
    admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<FeedDataRequest>,
) -> ApiResult<FeedUploadResponse> {
    let feed = require_feed_data(payload)?;
    let validation = validate_feed(&feed);
    if !validation.is_valid {
        return Err(AppError::Validation(format!(
            "Feed validation failed: {}",
            validation.errors.join("; ")
        )));
    }

    let body = serde_json::to_vec_pretty(&feed)
        .map_err(|e| AppError::Internal(format!("Feed encode error: {e}")))?;
    let upload = state
        .storage
        .put(
            &state.config.roku.feed_key,
            body,
            JSON_CONTENT_TYPE,
            &upload_metadata(validation.total_videos),
        )
        .await?;

    tracing::info!(key = %upload.key, videos = validation.total_videos, by = %admin.email, "Roku feed uploaded");
    Ok(ApiResponse::ok(FeedUploadResponse { validation, upload }))
}
