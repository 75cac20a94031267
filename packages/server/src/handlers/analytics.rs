use axum::extract::State;
use common::analytics::{PlatformAnalytics, generate_platform_analytics, summarize_storage};
use tracing::instrument;

use crate::error::ErrorBody;
use crate::extractors::auth::AdminUser;
use crate::extractors::query::AppQuery;
use crate::handlers::ApiResult;
use crate::models::analytics::{AnalyticsKind, AnalyticsQuery, AnalyticsReport};
use crate::models::shared::ApiResponse;
use crate::state::AppState;

// ThreadRng is !Send, so it must not live in the handler future.
fn platform_report() -> PlatformAnalytics {
    generate_platform_analytics(&mut rand::rng(), chrono::Utc::now())
}

#[utoipa::path(
    get,
    path = "/analytics",
    tag = "Analytics",
    operation_id = "getAnalytics",
    summary = "Network analytics",
    description = "`type=platform` returns generated per-platform figures (mock data). `type=storage` summarises the objects in storage.",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Analytics report", body = ApiResponse<AnalyticsReport>),
        (status = 400, description = "Unknown type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_admin, state, query), fields(kind = ?query.kind))]
pub async fn analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AnalyticsQuery>,
) -> ApiResult<AnalyticsReport> {
    let report = match query.kind {
        AnalyticsKind::Platform => AnalyticsReport::Platform(platform_report()),
        AnalyticsKind::Storage => {
            let objects = state.storage.list_all(None).await?;
            AnalyticsReport::Storage(summarize_storage(&objects))
        }
    };
    Ok(ApiResponse::ok(report))
}
