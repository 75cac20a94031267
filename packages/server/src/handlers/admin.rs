use axum::extract::State;
use tracing::instrument;

use crate::error::ErrorBody;
use crate::extractors::auth::AdminUser;
use crate::handlers::ApiResult;
use crate::models::catalog::DashboardStats;
use crate::models::shared::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    operation_id = "getDashboardStats",
    summary = "Dashboard statistics",
    description = "Catalog totals shown on the admin dashboard.",
    responses(
        (status = 200, description = "Statistics", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state))]
pub async fn dashboard_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> ApiResult<DashboardStats> {
    let catalog = state.catalog.read().await;
    Ok(ApiResponse::ok(DashboardStats::new(
        catalog.stats(),
        catalog.categories.len(),
    )))
}
