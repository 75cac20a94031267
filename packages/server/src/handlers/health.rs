use axum::extract::State;
use common::storage::s3::S3Settings;
use tracing::instrument;

use crate::handlers::ApiResult;
use crate::models::health::{EnvironmentInfo, HealthResponse};
use crate::models::shared::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "healthCheck",
    summary = "Service health",
    description = "Reports that the API is up, together with build and storage configuration details.",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<HealthResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    let storage = &state.config.storage;
    let aws_configured = S3Settings::from(&storage.s3).has_credentials();

    Ok(ApiResponse::ok(HealthResponse {
        message: "API is working correctly".into(),
        timestamp: chrono::Utc::now(),
        environment: EnvironmentInfo {
            version: env!("CARGO_PKG_VERSION"),
            platform: std::env::consts::OS,
            storage_backend: state.storage.backend_name(),
            aws_configured,
            region: storage.s3.region.clone(),
            bucket: storage.s3.bucket.clone(),
        },
    }))
}
