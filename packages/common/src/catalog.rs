//! In-memory view over the catalog fixture documents.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::search_videos;
use crate::video::{Category, Commercial, Video, VideoPatch};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("video {0} not found")]
    VideoNotFound(String),
    #[error("video {0} already exists")]
    DuplicateId(String),
    #[error("malformed catalog document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// `videos.json`: the video list plus the commercial pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideosDocument {
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub commercials: Vec<Commercial>,
}

/// `categories.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    ViewCount,
    Title,
    Duration,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "view_count" => Some(Self::ViewCount),
            "title" => Some(Self::Title),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters, ordering and paging for a video listing.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u64,
    pub per_page: u64,
}

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    #[schema(example = 3)]
    pub total_pages: u64,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CatalogStats {
    pub total_videos: usize,
    pub total_views: u64,
    pub featured_videos: usize,
    /// Sum of all durations in seconds.
    pub total_duration: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub videos: Vec<Video>,
    pub categories: Vec<Category>,
    pub commercials: Vec<Commercial>,
}

impl Catalog {
    pub fn from_documents(videos: VideosDocument, categories: CategoriesDocument) -> Self {
        Self {
            videos: videos.videos,
            categories: categories.categories,
            commercials: videos.commercials,
        }
    }

    pub fn from_json(videos: &str, categories: &str) -> Result<Self, CatalogError> {
        Ok(Self::from_documents(
            serde_json::from_str(videos)?,
            serde_json::from_str(categories)?,
        ))
    }

    pub fn videos_document(&self) -> VideosDocument {
        VideosDocument {
            videos: self.videos.clone(),
            commercials: self.commercials.clone(),
        }
    }

    pub fn categories_document(&self) -> CategoriesDocument {
        CategoriesDocument {
            categories: self.categories.clone(),
        }
    }

    pub fn video(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn videos_in_category<'a>(
        &'a self,
        category_id: &'a str,
    ) -> impl Iterator<Item = &'a Video> {
        self.videos
            .iter()
            .filter(move |v| v.category_id == category_id)
    }

    pub fn featured(&self) -> impl Iterator<Item = &Video> {
        self.videos.iter().filter(|v| v.featured)
    }

    pub fn search(&self, query: &str) -> Vec<&Video> {
        search_videos(&self.videos, query)
    }

    /// Other videos in the same category, in catalog order.
    pub fn related(&self, video: &Video, limit: usize) -> Vec<&Video> {
        self.videos
            .iter()
            .filter(|v| v.category_id == video.category_id && v.id != video.id)
            .take(limit)
            .collect()
    }

    pub fn categories_sorted(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.display_order);
        categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_videos: self.videos.len(),
            total_views: self.videos.iter().map(|v| v.view_count).sum(),
            featured_videos: self.featured().count(),
            total_duration: self.videos.iter().map(|v| v.duration).sum(),
        }
    }

    pub fn list(&self, query: &ListQuery) -> Page<&Video> {
        let page = query.page.max(1);
        let per_page = if query.per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            query.per_page.clamp(1, MAX_PER_PAGE)
        };

        let mut matched: Vec<&Video> = self
            .videos
            .iter()
            .filter(|v| query.category.as_deref().is_none_or(|c| v.category_id == c))
            .filter(|v| query.featured.is_none_or(|f| v.featured == f))
            .collect();

        matched.sort_by(|a, b| {
            let ord = compare(a, b, query.sort_by);
            match query.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let total = matched.len() as u64;
        let offset = (page - 1).saturating_mul(per_page);
        let items = matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(per_page as usize)
            .collect();

        Page {
            items,
            pagination: Pagination {
                page,
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }

    pub fn insert(&mut self, video: Video) -> Result<&Video, CatalogError> {
        if self.video(&video.id).is_some() {
            return Err(CatalogError::DuplicateId(video.id));
        }
        let index = self.videos.len();
        self.videos.push(video);
        Ok(&self.videos[index])
    }

    pub fn update(
        &mut self,
        id: &str,
        patch: VideoPatch,
        now: DateTime<Utc>,
    ) -> Result<&Video, CatalogError> {
        let video = self
            .videos
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| CatalogError::VideoNotFound(id.to_string()))?;
        video.apply_patch(patch, now);
        Ok(video)
    }

    pub fn remove(&mut self, id: &str) -> Result<Video, CatalogError> {
        let index = self
            .videos
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| CatalogError::VideoNotFound(id.to_string()))?;
        Ok(self.videos.remove(index))
    }

    /// Returns the new count, or `None` for unknown ids.
    pub fn increment_views(&mut self, id: &str) -> Option<u64> {
        let video = self.videos.iter_mut().find(|v| v.id == id)?;
        video.view_count += 1;
        Some(video.view_count)
    }
}

fn compare(a: &Video, b: &Video, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::ViewCount => a.view_count.cmp(&b.view_count),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Duration => a.duration.cmp(&b.duration),
    }
}
