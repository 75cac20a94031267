use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::is_valid_video_url;

/// A playable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Video {
    #[schema(example = "1718000000000")]
    pub id: String,
    #[schema(example = "Flat Earth Documentary Series - Episode 1")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "https://fechannel-videos.s3.us-east-1.amazonaws.com/videos/episode-1.mp4")]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[schema(example = "documentaries")]
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_status: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seo_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Category {
    #[schema(example = "documentaries")]
    pub id: String,
    #[schema(example = "Documentaries")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_order: i32,
}

/// A short clip that may be played as an interstitial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Commercial {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// The admin form used to create a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VideoDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub duration: u64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub duration: Option<u64>,
    pub featured: Option<bool>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<Vec<String>>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Video URL is required")]
    VideoUrlRequired,
    #[error("Please enter a valid video URL (MP4, M4V, MOV, AVI, WebM)")]
    InvalidVideoUrl,
    #[error("Please select a category")]
    CategoryRequired,
    #[error("Duration must be greater than 0 seconds")]
    InvalidDuration,
}

impl Video {
    pub fn from_draft(id: String, draft: VideoDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            video_url: draft.video_url.trim().to_string(),
            thumbnail_url: draft.thumbnail_url,
            category_id: draft.category_id,
            tags: draft.tags,
            duration: draft.duration,
            file_size: None,
            upload_status: Some("completed".into()),
            featured: draft.featured,
            view_count: 0,
            created_at: now,
            updated_at: Some(now),
            seo_description: draft.seo_description,
            seo_keywords: draft.seo_keywords,
            file_size_mb: None,
        }
    }

    pub fn apply_patch(&mut self, patch: VideoPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(video_url) = patch.video_url {
            self.video_url = video_url.trim().to_string();
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            self.thumbnail_url = thumbnail_url;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(seo_description) = patch.seo_description {
            self.seo_description = Some(seo_description);
        }
        if let Some(seo_keywords) = patch.seo_keywords {
            self.seo_keywords = seo_keywords;
        }
        self.updated_at = Some(now);
    }
}

fn check_title(title: &str) -> Result<(), DraftError> {
    if title.trim().is_empty() {
        return Err(DraftError::TitleRequired);
    }
    Ok(())
}

fn check_video_url(url: &str) -> Result<(), DraftError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(DraftError::VideoUrlRequired);
    }
    if !is_valid_video_url(url) {
        return Err(DraftError::InvalidVideoUrl);
    }
    Ok(())
}

fn check_category(category_id: &str) -> Result<(), DraftError> {
    if category_id.trim().is_empty() {
        return Err(DraftError::CategoryRequired);
    }
    Ok(())
}

fn check_duration(duration: u64) -> Result<(), DraftError> {
    if duration == 0 {
        return Err(DraftError::InvalidDuration);
    }
    Ok(())
}

/// Validate a create form. Checks run in the order the admin form reports them.
pub fn validate_draft(draft: &VideoDraft) -> Result<(), DraftError> {
    check_title(&draft.title)?;
    check_video_url(&draft.video_url)?;
    check_category(&draft.category_id)?;
    check_duration(draft.duration)
}

/// Validate only the fields a patch actually sets.
pub fn validate_patch(patch: &VideoPatch) -> Result<(), DraftError> {
    if let Some(title) = &patch.title {
        check_title(title)?;
    }
    if let Some(url) = &patch.video_url {
        check_video_url(url)?;
    }
    if let Some(category_id) = &patch.category_id {
        check_category(category_id)?;
    }
    if let Some(duration) = patch.duration {
        check_duration(duration)?;
    }
    Ok(())
}
