//! Token issuance: login with a password, or self-register.

use super::{body_to_map, str_field};
use crate::auth::create_token;
use crate::error::AppError;
use crate::schemas::{USER_AUTH, USER_REGISTER};
use crate::service::{RequestValidator, UserService};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

fn token_for(user: &Value, state: &AppState) -> Result<String, AppError> {
    let is_admin = user.get("isAdmin").and_then(Value::as_bool).unwrap_or(false);
    create_token(str_field(user, "username"), is_admin, &state.config)
}

pub async fn token(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &USER_AUTH)?;
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();
    let user = UserService::authenticate(&state.pool, username, password).await?;
    let token = token_for(&user, &state)?;
    Ok(Json(json!({ "token": token })))
}

/// New accounts are never admins.
pub async fn register(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &USER_REGISTER)?;
    let user = UserService::register(&state.pool, &body, state.config.bcrypt_work_factor).await?;
    let token = token_for(&user, &state)?;
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}
