use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::video::{Category, Video};

/// Roku truncates the short description shown on the springboard.
pub const SHORT_DESCRIPTION_LIMIT: usize = 200;

const VIDEO_QUALITY: &str = "HD";
const VIDEO_TYPE: &str = "MP4";

/// Channel-level values stamped into a generated feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    pub provider_name: String,
    pub language: String,
    /// Prefixed to thumbnails that are not absolute URLs.
    pub site_origin: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            provider_name: "Flat Earth TV Channel".into(),
            language: "en-us".into(),
            site_origin: "https://fechannel.com".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RokuFeed {
    pub provider_name: String,
    pub language: String,
    pub last_updated: DateTime<Utc>,
    pub movies: Vec<RokuFeedItem>,
    pub series: Vec<RokuSeries>,
}

/// A category rendered as a Roku series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RokuSeries {
    pub id: String,
    pub title: String,
    pub episodes: Vec<RokuFeedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RokuFeedItem {
    pub id: String,
    pub title: String,
    pub content: RokuContent,
    pub thumbnail: String,
    pub release_date: DateTime<Utc>,
    pub short_description: String,
    pub long_description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RokuContent {
    pub duration: u64,
    pub videos: Vec<RokuVideo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RokuVideo {
    pub url: String,
    pub quality: String,
    pub video_type: String,
}

/// Cut `description` to at most `max_chars` characters, ending in `...` when shortened.
pub fn truncate_description(description: &str, max_chars: usize) -> String {
    if description.chars().count() <= max_chars {
        return description.to_string();
    }
    let mut short: String = description
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect();
    short.push_str("...");
    short
}

fn absolute_thumbnail(thumbnail: &str, site_origin: &str) -> String {
    if thumbnail.starts_with("http") {
        thumbnail.to_string()
    } else {
        format!("{}{}", site_origin.trim_end_matches('/'), thumbnail)
    }
}

impl RokuFeedItem {
    pub fn from_video(video: &Video, site_origin: &str) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            content: RokuContent {
                duration: video.duration,
                videos: vec![RokuVideo {
                    url: video.video_url.clone(),
                    quality: VIDEO_QUALITY.into(),
                    video_type: VIDEO_TYPE.into(),
                }],
            },
            thumbnail: absolute_thumbnail(&video.thumbnail_url, site_origin),
            release_date: video.created_at,
            short_description: truncate_description(&video.description, SHORT_DESCRIPTION_LIMIT),
            long_description: video.description.clone(),
            tags: video.tags.clone(),
        }
    }
}

/// Build the channel feed: every video as a movie, plus one series per
/// non-empty category in display order.
pub fn generate_feed(
    videos: &[Video],
    categories: &[Category],
    settings: &FeedSettings,
    now: DateTime<Utc>,
) -> RokuFeed {
    let item = |video: &Video| RokuFeedItem::from_video(video, &settings.site_origin);

    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by_key(|c| c.display_order);

    let series = ordered
        .into_iter()
        .filter_map(|category| {
            let episodes: Vec<RokuFeedItem> = videos
                .iter()
                .filter(|v| v.category_id == category.id)
                .map(item)
                .collect();
            (!episodes.is_empty()).then(|| RokuSeries {
                id: category.id.clone(),
                title: category.name.clone(),
                episodes,
            })
        })
        .collect();

    RokuFeed {
        provider_name: settings.provider_name.clone(),
        language: settings.language.clone(),
        last_updated: now,
        movies: videos.iter().map(item).collect(),
        series,
    }
}
