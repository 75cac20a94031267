use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{self, ADMIN_ROLE};

/// Authenticated administrator extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require an admin session.
pub struct AdminUser {
    pub email: String,
    /// Expiry as a Unix timestamp.
    pub expires_at: i64,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(&state.config.auth.jwt_secret, token)
            .map_err(|_| AppError::TokenInvalid)?;

        if claims.role != ADMIN_ROLE {
            return Err(AppError::TokenInvalid);
        }

        Ok(AdminUser {
            email: claims.sub,
            expires_at: claims.exp,
        })
    }
}
