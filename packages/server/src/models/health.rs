use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check payload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "API is working correctly")]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: EnvironmentInfo,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EnvironmentInfo {
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    #[schema(example = "linux")]
    pub platform: &'static str,
    /// Active object storage backend.
    #[schema(example = "s3")]
    pub storage_backend: &'static str,
    /// Whether static S3 credentials are configured.
    pub aws_configured: bool,
    #[schema(example = "us-east-1")]
    pub region: String,
    #[schema(example = "fechannel-videos")]
    pub bucket: String,
}
