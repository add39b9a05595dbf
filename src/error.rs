//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures raised while building SQL fragments from client input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    /// Partial update with no fields.
    #[error("No data")]
    EmptyInput,
    /// Lower filter bound above the upper one.
    #[error("Max should be greater than Min.")]
    InconsistentBounds,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Clause(#[from] ClauseError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request failed validation")]
    Validation(Vec<String>),
    #[error("unauthorized")]
    Unauthorized,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hash: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Clause(_) | AppError::BadRequest(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Db(_)
            | AppError::Token(_)
            | AppError::Hash(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Clause(_) | AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Db(sqlx::Error::RowNotFound) => "not_found",
            AppError::Db(_) => "database_error",
            AppError::Token(_) => "token_error",
            AppError::Hash(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let details = match &self {
            AppError::Validation(errs) => Some(serde_json::json!(errs)),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                status: status.as_u16(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
