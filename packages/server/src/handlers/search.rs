use axum::extract::State;
use tracing::instrument;

use crate::error::ErrorBody;
use crate::extractors::query::AppQuery;
use crate::handlers::ApiResult;
use crate::models::catalog::{SearchQuery, SearchResponse};
use crate::models::shared::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/search",
    tag = "Search",
    operation_id = "searchVideos",
    summary = "Search videos",
    description = "Case-insensitive match on title, description and tags. A blank query returns no results.",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matches in catalog order", body = ApiResponse<SearchResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let query = query.q.unwrap_or_default().trim().to_string();
    let catalog = state.catalog.read().await;
    let results: Vec<_> = catalog.search(&query).into_iter().cloned().collect();

    Ok(ApiResponse::ok(SearchResponse {
        total: results.len(),
        query,
        results,
    }))
}
