use chrono::{Duration, Utc};
use jsonwebtoken::errors::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Admin email
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a token for `email` that expires after `ttl_hours`.
pub fn sign(secret: &str, email: &str, ttl_hours: i64) -> Result<(String, i64)> {
    let now = Utc::now();
    let expiration = (now + Duration::hours(ttl_hours)).timestamp();

    let claims = Claims {
        sub: email.to_owned(),
        role: ADMIN_ROLE.to_owned(),
        iat: now.timestamp(),
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, expiration))
}

/// Verify and decode a JWT token.
pub fn verify(secret: &str, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
