//! User handlers. Listing and creating users is admin-only; a user may read,
//! change or delete their own record.

use super::{body_to_map, str_field};
use crate::auth::create_token;
use crate::error::AppError;
use crate::extractors::{Admin, AuthorizedUser};
use crate::response::{deleted, success_many, success_one};
use crate::schemas::{USER_NEW, USER_UPDATE};
use crate::service::{RequestValidator, UserService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

/// Admin-created user; the response carries a token for the new account.
pub async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &USER_NEW)?;
    let user = UserService::register(&state.pool, &body, state.config.bcrypt_work_factor).await?;
    let is_admin = user.get("isAdmin").and_then(Value::as_bool).unwrap_or(false);
    let token = create_token(str_field(&user, "username"), is_admin, &state.config)?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user, "token": token }))))
}

pub async fn list(State(state): State<AppState>, _admin: Admin) -> Result<impl IntoResponse, AppError> {
    let users = UserService::find_all(&state.pool).await?;
    Ok(success_many("users", users))
}

pub async fn read(
    State(state): State<AppState>,
    _user: AuthorizedUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::get(&state.pool, &username).await?;
    Ok(success_one("user", user))
}

pub async fn update(
    State(state): State<AppState>,
    _user: AuthorizedUser,
    Path(username): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &USER_UPDATE)?;
    let user = UserService::update(&state.pool, &username, &body, state.config.bcrypt_work_factor).await?;
    Ok(success_one("user", user))
}

pub async fn delete(
    State(state): State<AppState>,
    _user: AuthorizedUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    UserService::remove(&state.pool, &username).await?;
    Ok(deleted(username))
}
