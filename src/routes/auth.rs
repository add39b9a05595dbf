use crate::handlers::auth::{register, token};
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/token", post(token))
        .route("/auth/register", post(register))
        .with_state(state)
}
