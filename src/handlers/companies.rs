//! Company handlers. Writes require an admin token; reads are public.

use super::body_to_map;
use crate::error::AppError;
use crate::extractors::Admin;
use crate::response::{deleted, success_created, success_many, success_one};
use crate::schemas::{COMPANY_NEW, COMPANY_SEARCH, COMPANY_UPDATE};
use crate::service::{CompanyService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &COMPANY_NEW)?;
    let company = CompanyService::create(&state.pool, &body).await?;
    Ok(success_created("company", company))
}

/// Query filters: `nameLike`, `minEmployees`, `maxEmployees`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let filters = RequestValidator::coerce_query(params, &COMPANY_SEARCH);
    RequestValidator::validate(&filters, &COMPANY_SEARCH)?;
    let companies = CompanyService::find_all(&state.pool, &filters).await?;
    Ok(success_many("companies", companies))
}

pub async fn read(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = CompanyService::get(&state.pool, &handle).await?;
    Ok(success_one("company", company))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: Admin,
    Path(handle): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &COMPANY_UPDATE)?;
    let company = CompanyService::update(&state.pool, &handle, &body).await?;
    Ok(success_one("company", company))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: Admin,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    CompanyService::remove(&state.pool, &handle).await?;
    Ok(deleted(handle))
}
