use common::roku::{ChannelFeed, ChannelKind, FeedValidation};
use common::storage::PutOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body carrying a feed document to check.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct FeedDataRequest {
    /// The feed as JSON; any shape is accepted and reported on.
    #[serde(default)]
    pub feed_data: Value,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FeedValidationResponse {
    pub validation: FeedValidation,
}

/// A remote feed together with its validation report.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RemoteFeedResponse {
    #[schema(example = "https://fechannel.com/roku-feed.json")]
    pub url: String,
    pub feed: Value,
    pub validation: FeedValidation,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FeedUploadResponse {
    pub validation: FeedValidation,
    pub upload: PutOutcome,
}

/// One channel's feed, labelled.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ChannelFeedEntry {
    pub channel: ChannelKind,
    #[schema(example = "FEChannel TV")]
    pub label: &'static str,
    pub feed: ChannelFeed,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PublishedFeed {
    pub channel: ChannelKind,
    #[schema(example = "roku-feeds/tv.json")]
    pub key: String,
    pub url: String,
    pub total_videos: usize,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PublishResponse {
    pub published: Vec<PublishedFeed>,
}
