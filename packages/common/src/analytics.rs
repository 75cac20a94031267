//! Dashboard analytics.
//!
//! Platform numbers are generated; there is no analytics backend yet. Storage
//! numbers are computed from a real object listing.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use serde_json::{Value, json};

use crate::format::format_file_size;
use crate::storage::ObjectInfo;
use crate::validation::is_video_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub views: u64,
    pub users: u64,
    pub watch_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Platforms {
    pub web: PlatformStats,
    pub roku: PlatformStats,
    pub mobile: PlatformStats,
}

impl Platforms {
    fn iter(&self) -> impl Iterator<Item = &PlatformStats> {
        [&self.web, &self.roku, &self.mobile].into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_views: u64,
    pub total_users: u64,
    pub active_users: u64,
    pub total_watch_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TopVideo {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub duration: u64,
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DailyViews {
    pub date: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalytics {
    pub overview: Overview,
    pub platforms: Platforms,
    pub top_videos: Vec<TopVideo>,
    pub recent_activity: Vec<Activity>,
    pub views_over_time: Vec<DailyViews>,
}

/// `base + [0, spread)`
fn sample<R: Rng>(rng: &mut R, base: u64, spread: u64) -> u64 {
    base + rng.random_range(0..spread)
}

fn platform<R: Rng>(rng: &mut R, views: (u64, u64), users: (u64, u64), watch: (u64, u64)) -> PlatformStats {
    PlatformStats {
        views: sample(rng, views.0, views.1),
        users: sample(rng, users.0, users.1),
        watch_time: sample(rng, watch.0, watch.1),
    }
}

fn top_video(id: &str, title: &str, views: u64, duration: u64, thumbnail: &str) -> TopVideo {
    TopVideo {
        id: id.into(),
        title: title.into(),
        views,
        duration,
        thumbnail: thumbnail.into(),
    }
}

/// Some time within the last `hours` hours.
fn recently<R: Rng>(rng: &mut R, now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    now - Duration::milliseconds(rng.random_range(0..hours * 3_600_000))
}

const VIEWS_OVER_TIME: [(&str, u64); 7] = [
    ("2024-01-01", 1200),
    ("2024-01-02", 1350),
    ("2024-01-03", 1180),
    ("2024-01-04", 1420),
    ("2024-01-05", 1380),
    ("2024-01-06", 1550),
    ("2024-01-07", 1680),
];

pub fn generate_platform_analytics<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> PlatformAnalytics {
    let platforms = Platforms {
        web: platform(rng, (5_000, 10_000), (500, 1_000), (25_000, 50_000)),
        roku: platform(rng, (3_000, 8_000), (300, 800), (20_000, 40_000)),
        mobile: platform(rng, (2_000, 6_000), (200, 600), (15_000, 30_000)),
    };

    let total_users: u64 = platforms.iter().map(|p| p.users).sum();
    let overview = Overview {
        total_views: platforms.iter().map(|p| p.views).sum(),
        total_users,
        active_users: total_users * 3 / 10,
        total_watch_time: platforms.iter().map(|p| p.watch_time).sum(),
    };

    let top_videos = vec![
        top_video(
            "1",
            "Flat Earth Documentary Series - Episode 1",
            sample(rng, 2_000, 5_000),
            3600,
            "/images/1-fechannel-336X210.jpg",
        ),
        top_video(
            "2",
            "Scientific Evidence for Flat Earth",
            sample(rng, 1_500, 4_000),
            2700,
            "/images/2-fechannel-248X140.jpg",
        ),
        top_video(
            "3",
            "Debunking Globe Earth Myths",
            sample(rng, 1_200, 3_500),
            4200,
            "/images/3ss-fechannel-540X405.jpg",
        ),
    ];

    let recent_activity = vec![
        Activity {
            kind: "view".into(),
            description: "New video watched".into(),
            timestamp: recently(rng, now, 1),
            data: json!({ "videoTitle": "Flat Earth Documentary Series - Episode 1" }),
        },
        Activity {
            kind: "upload".into(),
            description: "Video uploaded".into(),
            timestamp: recently(rng, now, 2),
            data: json!({ "videoTitle": "New Flat Earth Evidence" }),
        },
        Activity {
            kind: "user".into(),
            description: "New user registered".into(),
            timestamp: recently(rng, now, 3),
            data: json!({ "platform": "Web" }),
        },
    ];

    PlatformAnalytics {
        overview,
        platforms,
        top_videos,
        recent_activity,
        views_over_time: VIEWS_OVER_TIME
            .iter()
            .map(|&(date, views)| DailyViews {
                date: date.into(),
                views,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    pub total_files: usize,
    pub video_files: usize,
    pub total_size: u64,
    pub formatted_size: String,
}

pub fn summarize_storage(objects: &[ObjectInfo]) -> StorageSummary {
    let total_size = objects.iter().map(|o| o.size).sum();
    StorageSummary {
        total_files: objects.len(),
        video_files: objects.iter().filter(|o| is_video_key(&o.key)).count(),
        total_size,
        formatted_size: format_file_size(total_size),
    }
}
