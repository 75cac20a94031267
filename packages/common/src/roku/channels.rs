use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::video::Video;

/// Language stamped on every network channel feed.
pub const CHANNEL_LANGUAGE: &str = "en";

const PLAYLIST_SIZE: usize = 20;

/// The channels of the network; each has its own published feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Master,
    Tv,
    Radio,
    Documentary,
    Educational,
    Community,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::Master,
        ChannelKind::Tv,
        ChannelKind::Radio,
        ChannelKind::Documentary,
        ChannelKind::Educational,
        ChannelKind::Community,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Tv => "tv",
            Self::Radio => "radio",
            Self::Documentary => "documentary",
            Self::Educational => "educational",
            Self::Community => "community",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    pub fn provider_name(self) -> &'static str {
        match self {
            Self::Master => "Flat Earth Media Group",
            Self::Tv => "FEChannel TV",
            Self::Radio => "FE Radio Live",
            Self::Documentary => "FE Documentary Channel",
            Self::Educational => "FE Educational Channel",
            Self::Community => "FE Community Channel",
        }
    }

    /// Label shown next to the feed URL in the admin dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Self::Master => "Master Feed (All Channels)",
            other => other.provider_name(),
        }
    }

    fn carries(self, video: &Video) -> bool {
        let tagged = |needle: &str| {
            video
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
        };
        match self {
            Self::Master | Self::Tv => true,
            Self::Radio => tagged("audio") || tagged("radio") || video.category_id == "interviews",
            Self::Documentary => video.category_id == "documentaries",
            Self::Educational => video.category_id == "educational",
            Self::Community => tagged("community") || tagged("user"),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelFeed {
    pub provider_name: String,
    pub language: String,
    pub last_updated: DateTime<Utc>,
    pub categories: Vec<ChannelCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCategory {
    pub name: String,
    pub playlist_name: String,
    pub videos: Vec<ChannelVideo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentRating {
    pub rating: String,
    pub rating_source: String,
}

impl Default for ContentRating {
    fn default() -> Self {
        Self {
            rating: "NR".into(),
            rating_source: "MPAA".into(),
        }
    }
}

/// A video in the export format consumed by the network channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub url: String,
    pub duration: u64,
    pub date_added: DateTime<Utc>,
    pub tags: Vec<String>,
    pub genres: Vec<String>,
    pub rating: ContentRating,
    pub captions: Vec<String>,
    pub short_description: String,
    pub long_description: String,
    pub quality: String,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub episode_number: Option<u32>,
    pub season_number: Option<u32>,
    pub series_title: Option<String>,
}

impl From<&Video> for ChannelVideo {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            description: video.description.clone(),
            thumbnail: video.thumbnail_url.clone(),
            url: video.video_url.clone(),
            duration: video.duration,
            date_added: video.created_at,
            tags: video.tags.clone(),
            genres: vec![genre_for_category(&video.category_id).to_string()],
            rating: ContentRating::default(),
            captions: Vec::new(),
            short_description: video.description.chars().take(200).collect(),
            long_description: video.description.clone(),
            quality: "HD".into(),
            actors: Vec::new(),
            directors: Vec::new(),
            episode_number: None,
            season_number: None,
            series_title: None,
        }
    }
}

pub fn genre_for_category(category_id: &str) -> &'static str {
    match category_id {
        "documentaries" => "Documentary",
        "interviews" => "Interview",
        "educational" => "Educational",
        "news" => "News",
        "research" => "Research",
        _ => "General",
    }
}

fn playlist<'a>(
    name: &str,
    playlist_name: &str,
    videos: impl IntoIterator<Item = &'a Video>,
) -> ChannelCategory {
    ChannelCategory {
        name: name.into(),
        playlist_name: playlist_name.into(),
        videos: videos.into_iter().map(ChannelVideo::from).collect(),
    }
}

pub fn generate_channel_feed(kind: ChannelKind, videos: &[Video], now: DateTime<Utc>) -> ChannelFeed {
    let carried: Vec<&Video> = videos.iter().filter(|v| kind.carries(v)).collect();

    let categories = match kind {
        ChannelKind::Master => vec![
            playlist(
                "Featured Content",
                "Featured",
                carried.iter().copied().filter(|v| v.featured),
            ),
            playlist("All Content", "All Videos", carried.iter().copied()),
        ],
        _ => {
            let mut popular = carried.clone();
            // Stable, so equal view counts keep catalog order.
            popular.sort_by(|a, b| b.view_count.cmp(&a.view_count));
            vec![
                playlist(
                    "Latest",
                    "Latest Content",
                    carried.iter().copied().take(PLAYLIST_SIZE),
                ),
                playlist(
                    "Popular",
                    "Most Viewed",
                    popular.into_iter().take(PLAYLIST_SIZE),
                ),
                playlist("All Content", "All Videos", carried.iter().copied()),
            ]
        }
    };

    ChannelFeed {
        provider_name: kind.provider_name().into(),
        language: CHANNEL_LANGUAGE.into(),
        last_updated: now,
        categories,
    }
}

/// Every channel feed, master first.
pub fn generate_all_feeds(videos: &[Video], now: DateTime<Utc>) -> Vec<(ChannelKind, ChannelFeed)> {
    ChannelKind::ALL
        .into_iter()
        .map(|kind| (kind, generate_channel_feed(kind, videos, now)))
        .collect()
}

/// Object key a channel feed is published under.
pub fn feed_key(kind: ChannelKind) -> String {
    format!("roku-feeds/{kind}.json")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FeedUrl {
    pub label: String,
    pub channel: ChannelKind,
    pub url: String,
}

/// Every channel's feed URL, resolving each published key with `public_url`.
pub fn feed_urls(public_url: impl Fn(&str) -> String) -> Vec<FeedUrl> {
    ChannelKind::ALL
        .into_iter()
        .map(|kind| FeedUrl {
            label: kind.label().into(),
            channel: kind,
            url: public_url(&feed_key(kind)),
        })
        .collect()
}
