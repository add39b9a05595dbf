//! Job handlers. Writes require an admin token; reads are public.

use super::{body_to_map, str_field};
use crate::error::AppError;
use crate::extractors::Admin;
use crate::response::{deleted, success_created, success_many, success_one};
use crate::schemas::{JOB_NEW, JOB_SEARCH, JOB_UPDATE};
use crate::service::{JobService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str.parse().map_err(|_| AppError::BadRequest("invalid id".into()))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &JOB_NEW)?;
    let job = JobService::create(&state.pool, &body).await?;
    Ok(success_created("job", job))
}

/// Query filters: `title`, `minSalary`, `hasEquity`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let filters = RequestValidator::coerce_query(params, &JOB_SEARCH);
    RequestValidator::validate(&filters, &JOB_SEARCH)?;
    let jobs = JobService::find_all(&state.pool, &filters).await?;
    Ok(success_many("jobs", jobs))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job = JobService::get(&state.pool, parse_id(&id_str)?).await?;
    Ok(success_one("job", job))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: Admin,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &JOB_UPDATE)?;
    let job = JobService::update(&state.pool, id, &body).await?;
    Ok(success_one("job", job))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: Admin,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job = JobService::remove(&state.pool, parse_id(&id_str)?).await?;
    Ok(deleted(json!({ "id": job.get("id"), "title": str_field(&job, "title") })))
}
