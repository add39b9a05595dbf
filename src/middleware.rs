//! Request middleware: token authentication and request ids.

use crate::auth::{bearer_token, verify_token};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// If a valid bearer token is present, store its claims in request extensions.
///
/// A missing or invalid token is not an error here; the authorization
/// extractors decide what each route requires.
pub async fn authenticate_jwt(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let claims = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .and_then(|token| match verify_token(token, &state.config.secret_key) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid token");
                None
            }
        });
    if let Some(c) = claims {
        req.extensions_mut().insert(c);
    }
    next.run(req).await
}

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Tag each request with a fresh uuid, echoed back in `x-request-id`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(id.clone()));
    let mut resp = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}
