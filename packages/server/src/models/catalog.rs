use common::format::{format_duration, format_view_count};
use common::{Category, CatalogStats, Video};
use serde::{Deserialize, Serialize};

/// A category together with its videos.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryVideosResponse {
    pub category: Category,
    pub videos: Vec<Video>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free text matched against title, description and tags.
    #[param(example = "horizon")]
    pub q: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    #[schema(example = "horizon")]
    pub query: String,
    pub results: Vec<Video>,
    pub total: usize,
}

/// Admin dashboard figures.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub stats: CatalogStats,
    pub total_categories: usize,
    #[schema(example = "12.3K")]
    pub formatted_total_views: String,
    #[schema(example = "4:05:00")]
    pub formatted_total_duration: String,
}

impl DashboardStats {
    pub fn new(stats: CatalogStats, total_categories: usize) -> Self {
        Self {
            formatted_total_views: format_view_count(stats.total_views),
            formatted_total_duration: format_duration(stats.total_duration),
            total_categories,
            stats,
        }
    }
}
