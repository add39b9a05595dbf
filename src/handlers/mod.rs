//! HTTP handlers for companies, jobs, users and auth.

pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;

use crate::error::AppError;
use serde_json::{Map, Value};

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

fn str_field<'a>(row: &'a Value, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).unwrap_or_default()
}
