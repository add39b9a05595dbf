//! Liveness, readiness and version probes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::time::Duration;

const READY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct Probe {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<PoolStatus>,
}

#[derive(Serialize)]
struct PoolStatus {
    reachable: bool,
    connections: u32,
    idle: usize,
}

#[derive(Serialize)]
struct VersionBody {
    name: &'static str,
    version: &'static str,
}

async fn health() -> Json<Probe> {
    Json(Probe {
        status: "ok",
        database: None,
    })
}

/// 503 when the database does not answer `SELECT 1` within [`READY_TIMEOUT`].
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Probe>) {
    let ping = sqlx::query("SELECT 1").execute(&state.pool);
    let reachable = matches!(tokio::time::timeout(READY_TIMEOUT, ping).await, Ok(Ok(_)));
    if !reachable {
        tracing::warn!("readiness check: database unreachable");
    }
    let database = PoolStatus {
        reachable,
        connections: state.pool.size(),
        idle: state.pool.num_idle(),
    };
    let (code, status) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(Probe {
            status,
            database: Some(database),
        }),
    )
}

async fn version() -> Json<VersionBody> {
    Json(VersionBody {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
