use axum::Json;

use crate::error::AppError;
use crate::models::shared::ApiResponse;

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod categories;
pub mod health;
pub mod roku;
pub mod search;
pub mod storage;
pub mod videos;

/// Result of a handler answering with the success envelope.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;
