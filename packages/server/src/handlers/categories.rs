use axum::extract::{Path, State};
use common::Category;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::handlers::ApiResult;
use crate::models::catalog::CategoryVideosResponse;
use crate::models::shared::ApiResponse;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Category not found".into())
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List categories",
    description = "All categories ordered by `display_order`.",
    responses(
        (status = 200, description = "Categories", body = ApiResponse<Vec<Category>>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let catalog = state.catalog.read().await;
    Ok(ApiResponse::ok(
        catalog.categories_sorted().into_iter().cloned().collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    operation_id = "getCategory",
    summary = "Get a category",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<Category>),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Category> {
    let catalog = state.catalog.read().await;
    let category = catalog.category(&id).ok_or_else(not_found)?;
    Ok(ApiResponse::ok(category.clone()))
}

#[utoipa::path(
    get,
    path = "/categories/{id}/videos",
    tag = "Categories",
    operation_id = "listCategoryVideos",
    summary = "Videos in a category",
    description = "The category and its videos, in catalog order.",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category with videos", body = ApiResponse<CategoryVideosResponse>),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn category_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CategoryVideosResponse> {
    let catalog = state.catalog.read().await;
    let category = catalog.category(&id).ok_or_else(not_found)?.clone();
    let videos = catalog.videos_in_category(&id).cloned().collect();
    Ok(ApiResponse::ok(CategoryVideosResponse { category, videos }))
}
