use crate::handlers::users::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/:username", get(read).patch(update).delete(delete_handler))
        .with_state(state)
}
