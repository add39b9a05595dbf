//! Authorization extractors over the claims stored by [`crate::middleware::authenticate_jwt`].

use crate::auth::Claims;
use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;

fn claims(parts: &Parts) -> Option<&Claims> {
    parts.extensions.get::<Claims>()
}

/// Any user with a valid token.
#[derive(Clone, Debug)]
pub struct LoggedIn(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for LoggedIn
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        claims(parts)
            .filter(|c| !c.username.is_empty())
            .cloned()
            .map(LoggedIn)
            .ok_or(AppError::Unauthorized)
    }
}

/// A logged-in user whose token carries `isAdmin: true`.
#[derive(Clone, Debug)]
pub struct Admin(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let LoggedIn(c) = LoggedIn::from_request_parts(parts, state).await?;
        if c.is_admin {
            Ok(Admin(c))
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

/// An admin, or the user named by the `:username` path segment.
#[derive(Clone, Debug)]
pub struct AuthorizedUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let LoggedIn(c) = LoggedIn::from_request_parts(parts, state).await?;
        if c.is_admin {
            return Ok(AuthorizedUser(c));
        }
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Unauthorized)?;
        if params.get("username") == Some(&c.username) {
            Ok(AuthorizedUser(c))
        } else {
            Err(AppError::Unauthorized)
        }
    }
}
