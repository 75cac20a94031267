use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .merge(auth_routes())
        .merge(video_routes())
        .merge(category_routes())
        .routes(routes!(handlers::search::search))
        .routes(routes!(handlers::admin::dashboard_stats))
        .routes(routes!(handlers::analytics::analytics))
        .merge(storage_routes(config))
        .merge(roku_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn video_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::videos::list_videos,
            handlers::videos::create_video
        ))
        .routes(routes!(handlers::videos::featured_videos))
        .routes(routes!(handlers::videos::generate_seo))
        .routes(routes!(
            handlers::videos::get_video,
            handlers::videos::update_video,
            handlers::videos::delete_video
        ))
        .routes(routes!(handlers::videos::related_videos))
        .routes(routes!(handlers::videos::record_view))
        .routes(routes!(handlers::videos::playback_plan))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::categories::list_categories))
        .routes(routes!(handlers::categories::get_category))
        .routes(routes!(handlers::categories::category_videos))
}

/// Base64 inflates bodies by a third; leave headroom for the JSON envelope.
fn upload_body_limit(config: &AppConfig) -> DefaultBodyLimit {
    let max = config.storage.max_upload_size.saturating_mul(4) / 3 + 64 * 1024;
    DefaultBodyLimit::max(usize::try_from(max).unwrap_or(usize::MAX))
}

fn storage_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let objects = OpenApiRouter::new()
        .routes(routes!(
            handlers::storage::list_objects,
            handlers::storage::upload_object,
            handlers::storage::delete_object
        ))
        .layer(upload_body_limit(config));

    OpenApiRouter::new()
        .merge(objects)
        .routes(routes!(handlers::storage::object_metadata))
        .routes(routes!(handlers::storage::create_upload_url))
}

fn roku_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::roku::roku_feed))
        .routes(routes!(handlers::roku::channel_feeds))
        .routes(routes!(handlers::roku::channel_feed_urls))
        .routes(routes!(handlers::roku::channel_feed))
        .routes(routes!(handlers::roku::publish_channel_feeds))
        .routes(routes!(handlers::roku::remote_feed))
        .routes(routes!(handlers::roku::validate))
        .routes(routes!(handlers::roku::upload))
}
