//! Response envelope helpers: every body is a single-key object, e.g. `{"company": {...}}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{Map, Value};

fn keyed<T: Serialize>(key: &str, data: T) -> Json<Value> {
    let mut body = Map::new();
    body.insert(key.to_string(), serde_json::to_value(data).unwrap_or(Value::Null));
    Json(Value::Object(body))
}

pub fn success_one<T: Serialize>(key: &str, data: T) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, keyed(key, data))
}

pub fn success_created<T: Serialize>(key: &str, data: T) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, keyed(key, data))
}

pub fn success_many<T: Serialize>(key: &str, data: Vec<T>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, keyed(key, data))
}

pub fn deleted<T: Serialize>(what: T) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, keyed("deleted", what))
}
