//! Auth tokens: HS256 JWTs carrying the username and admin flag.

use crate::error::AppError;
use crate::config::Config;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token payload; the same shape is stored in request extensions once verified.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a token for `username`, valid for `config.token_ttl_hours`.
pub fn create_token(username: &str, is_admin: bool, config: &Config) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        username: username.to_string(),
        is_admin,
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.token_ttl_hours)).timestamp(),
    };
    let key = EncodingKey::from_secret(config.secret_key.as_bytes());
    Ok(encode(&Header::new(Algorithm::HS256), &claims, &key)?)
}

/// Verify signature and expiry.
pub fn verify_token(token: &str, secret_key: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(secret_key.as_bytes());
    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// Token from an `Authorization` header value; the scheme is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
