//! Route tables and the assembled application router.

mod auth;
mod common;
mod companies;
mod jobs;
mod users;

pub use auth::auth_routes;
pub use common::common_routes;
pub use companies::company_routes;
pub use jobs::job_routes;
pub use users::user_routes;

use crate::error::AppError;
use crate::middleware::{authenticate_jwt, request_id};
use crate::state::AppState;
use axum::{http::Uri, middleware, Router};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Every route behind token authentication, tracing, a body limit and request ids.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .merge(company_routes(state.clone()))
        .merge(job_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state, authenticate_jwt))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn(request_id))
}
