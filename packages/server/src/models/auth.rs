use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@fechannel.com")]
    pub email: String,
    #[schema(example = "FEChannel2024!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: AdminProfile,
}

/// The signed-in administrator.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminProfile {
    #[schema(example = "admin@fechannel.com")]
    pub email: String,
    #[schema(example = "admin")]
    pub role: String,
    pub expires_at: Option<DateTime<Utc>>,
}
