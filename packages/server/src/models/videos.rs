use common::catalog::{DEFAULT_PER_PAGE, MAX_PER_PAGE, Pagination};
use common::format::{estimate_video_quality, format_duration, format_view_count};
use common::{Category, ListQuery, SortField, SortOrder, Video};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Query parameters for listing videos.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VideoListQuery {
    /// Only videos in this category.
    #[param(example = "documentaries")]
    pub category: Option<String>,
    /// Filter on the featured flag.
    pub featured: Option<bool>,
    /// One of `created_at` (default), `view_count`, `title`, `duration`.
    #[param(example = "created_at")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    #[param(example = "desc")]
    pub sort_order: Option<String>,
    /// Page number (1-based, default 1).
    #[param(example = 1, minimum = 1)]
    pub page: Option<u64>,
    /// Items per page (default 20, max 100).
    #[param(example = 20, minimum = 1, maximum = 100)]
    pub per_page: Option<u64>,
}

impl TryFrom<VideoListQuery> for ListQuery {
    type Error = AppError;

    fn try_from(query: VideoListQuery) -> Result<Self, Self::Error> {
        let sort_by = match query.sort_by.as_deref() {
            None => SortField::default(),
            Some(raw) => SortField::parse(raw).ok_or_else(|| {
                AppError::Validation(format!(
                    "sort_by must be one of: created_at, view_count, title, duration (got '{raw}')"
                ))
            })?,
        };
        let sort_order = match query.sort_order.as_deref() {
            None => SortOrder::default(),
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(raw) => {
                return Err(AppError::Validation(format!(
                    "sort_order must be 'asc' or 'desc' (got '{raw}')"
                )));
            }
        };

        Ok(ListQuery {
            category: query.category.filter(|c| !c.trim().is_empty()),
            featured: query.featured,
            sort_by,
            sort_order,
            page: query.page.unwrap_or(1).max(1),
            per_page: query
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        })
    }
}

/// Paginated video listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VideoListResponse {
    pub videos: Vec<Video>,
    pub pagination: Pagination,
}

/// A single video with display-ready fields.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    /// `MM:SS` or `H:MM:SS`.
    #[schema(example = "45:00")]
    pub formatted_duration: String,
    #[schema(example = "1.2K")]
    pub formatted_views: String,
    /// Rough quality label derived from bitrate, when the file size is known.
    #[schema(example = "720p")]
    pub estimated_quality: Option<&'static str>,
    pub category: Option<Category>,
}

impl VideoDetail {
    pub fn new(video: Video, category: Option<Category>) -> Self {
        let estimated_quality = video
            .file_size
            .map(|size| estimate_video_quality(size, video.duration));
        Self {
            formatted_duration: format_duration(video.duration),
            formatted_views: format_view_count(video.view_count),
            estimated_quality,
            category,
            video,
        }
    }
}

/// Query parameters for related videos.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RelatedQuery {
    /// Maximum number of results (default 6, max 50).
    #[param(example = 6, minimum = 1, maximum = 50)]
    pub limit: Option<usize>,
}

pub const DEFAULT_RELATED_LIMIT: usize = 6;
pub const MAX_RELATED_LIMIT: usize = 50;

impl RelatedQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_RELATED_LIMIT)
            .clamp(1, MAX_RELATED_LIMIT)
    }
}

/// View counter after an increment.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ViewCountResponse {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = 1251)]
    pub view_count: u64,
}

/// Request body for SEO suggestions.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SeoRequest {
    #[schema(example = "The Horizon Always Rises to Eye Level")]
    pub title: String,
    pub description: String,
    #[serde(default)]
    #[schema(example = "documentaries")]
    pub category_id: String,
}
