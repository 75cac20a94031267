use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::seo::SeoError;
use common::storage::StorageError;
use common::validation::UploadError;
use common::video::DraftError;
use common::CatalogError;
use serde::Serialize;

use crate::repository::RepositoryError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Human-readable error description.
    #[schema(example = "Video not found")]
    pub error: String,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `NOT_FOUND`, `NOT_SUPPORTED`,
    /// `UPSTREAM_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    NotFound(String),
    /// The configured backend cannot perform the operation.
    Unsupported(String),
    /// A remote service answered badly or not at all.
    Upstream(String),
    Internal(String),
}

fn body(code: &'static str, error: impl Into<String>) -> ErrorBody {
    ErrorBody {
        success: false,
        error: error.into(),
        code,
    }
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, body("VALIDATION_ERROR", msg)),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                body("TOKEN_MISSING", "Authentication required"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                body("TOKEN_INVALID", "Invalid or expired token"),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                body("INVALID_CREDENTIALS", "Invalid email or password"),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, body("NOT_FOUND", msg)),
            AppError::Unsupported(msg) => {
                (StatusCode::NOT_IMPLEMENTED, body("NOT_SUPPORTED", msg))
            }
            AppError::Upstream(detail) => {
                tracing::warn!("Upstream error: {}", detail);
                (StatusCode::BAD_GATEWAY, body("UPSTREAM_ERROR", detail))
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    body("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object '{key}' not found")),
            StorageError::InvalidKey(key) => {
                AppError::Validation(format!("Invalid object key: '{key}'"))
            }
            StorageError::SizeLimitExceeded { .. } => AppError::Validation(err.to_string()),
            StorageError::Unsupported(op) => {
                AppError::Unsupported(format!("Storage backend does not support {op}"))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::VideoNotFound(_) => AppError::NotFound("Video not found".into()),
            CatalogError::DuplicateId(_) => AppError::Validation(err.to_string()),
            CatalogError::Malformed(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Catalog(e) => e.into(),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<SeoError> for AppError {
    fn from(err: SeoError) -> Self {
        AppError::Validation(err.to_string())
    }
}
