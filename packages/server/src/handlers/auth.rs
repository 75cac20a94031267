use axum::extract::State;
use chrono::DateTime;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::extractors::json::AppJson;
use crate::handlers::ApiResult;
use crate::models::auth::{AdminProfile, LoginRequest, LoginResponse, validate_login_request};
use crate::models::shared::ApiResponse;
use crate::state::AppState;
use crate::utils::jwt::{self, ADMIN_ROLE};
use crate::utils::hash;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Admin login",
    description = "Exchanges the admin email and password for a bearer token.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    validate_login_request(&payload)?;

    let auth = &state.config.auth;
    let email_matches = payload.email.trim().eq_ignore_ascii_case(&auth.admin_email);

    let password_matches = hash::verify_password(&payload.password, &state.admin_password_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !(email_matches && password_matches) {
        tracing::info!("Rejected admin login");
        return Err(AppError::InvalidCredentials);
    }

    let (token, exp) = jwt::sign(&auth.jwt_secret, &auth.admin_email, auth.token_ttl_hours)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AppError::Internal(format!("Token expiry out of range: {exp}")))?;

    Ok(ApiResponse::ok(LoginResponse {
        token,
        token_type: "Bearer",
        expires_at,
        user: AdminProfile {
            email: auth.admin_email.clone(),
            role: ADMIN_ROLE.into(),
            expires_at: Some(expires_at),
        },
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    operation_id = "getCurrentAdmin",
    summary = "Current admin",
    description = "Returns the administrator the bearer token was issued to.",
    responses(
        (status = 200, description = "Current admin", body = ApiResponse<AdminProfile>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(admin), fields(email = %admin.email))]
pub async fn me(admin: AdminUser) -> ApiResult<AdminProfile> {
    Ok(ApiResponse::ok(AdminProfile {
        email: admin.email,
        role: ADMIN_ROLE.into(),
        expires_at: DateTime::from_timestamp(admin.expires_at, 0),
    }))
}
