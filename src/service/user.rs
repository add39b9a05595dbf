//! Users: registration, password authentication, and profile CRUD.
//!
//! Passwords are stored as bcrypt hashes and never selected into responses.
//! Hashing runs on the blocking pool.

use super::db::{constraint_error, fetch_all, fetch_optional};
use crate::error::AppError;
use crate::sql::{sql_for_partial_update, FieldNameMap};
use serde_json::{Map, Value};
use sqlx::PgPool;

const FIELD_NAMES: &FieldNameMap<'static> = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
];

const COLUMNS: &str = r#""username", "first_name", "last_name", "email", "is_admin""#;

async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

fn not_found(username: &str) -> AppError {
    AppError::NotFound(format!("No user: {}", username))
}

pub struct UserService;

impl UserService {
    /// Create a user from a validated body. `isAdmin` defaults to false.
    pub async fn register(pool: &PgPool, body: &Map<String, Value>, cost: u32) -> Result<Value, AppError> {
        let field = |k: &str| body.get(k).cloned().unwrap_or(Value::Null);
        let username = body.get("username").and_then(Value::as_str).unwrap_or_default().to_string();
        let password = body.get("password").and_then(Value::as_str).unwrap_or_default().to_string();
        let hashed = hash_password(password, cost).await?;
        let params = vec![
            Value::String(username.clone()),
            Value::String(hashed),
            field("firstName"),
            field("lastName"),
            field("email"),
            Value::Bool(body.get("isAdmin").and_then(Value::as_bool).unwrap_or(false)),
        ];
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COLUMNS
        );
        fetch_optional(pool, &sql, &params)
            .await
            .map_err(|e| constraint_error(e, |_| format!("Duplicate username: {}", username), String::new))?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Check a username/password pair. Unknown user and wrong password are indistinguishable.
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<Value, AppError> {
        tracing::debug!(username = %username, "authenticate");
        let hash: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        let Some(hash) = hash else {
            return Err(AppError::Unauthorized);
        };
        if !verify_password(password.to_string(), hash).await? {
            return Err(AppError::Unauthorized);
        }
        Self::get(pool, username).await
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Value>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", COLUMNS);
        fetch_all(pool, &sql, &[]).await
    }

    pub async fn get(pool: &PgPool, username: &str) -> Result<Value, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", COLUMNS);
        fetch_optional(pool, &sql, &[Value::String(username.to_string())])
            .await?
            .ok_or_else(|| not_found(username))
    }

    /// Partial update; a supplied password is re-hashed in place.
    pub async fn update(
        pool: &PgPool,
        username: &str,
        data: &Map<String, Value>,
        cost: u32,
    ) -> Result<Value, AppError> {
        let mut data = data.clone();
        if let Some(Value::String(password)) = data.get("password") {
            let hashed = hash_password(password.clone(), cost).await?;
            data.insert("password".to_string(), Value::String(hashed));
        }
        let set = sql_for_partial_update(&data, FIELD_NAMES)?;
        let sql = format!(
            "UPDATE users SET {} WHERE username = {} RETURNING {}",
            set.sql,
            set.next_placeholder(),
            COLUMNS
        );
        let mut params = set.params;
        params.push(Value::String(username.to_string()));
        fetch_optional(pool, &sql, &params)
            .await
            .map_err(|e| constraint_error(e, |_| format!("Duplicate username: {}", username), String::new))?
            .ok_or_else(|| not_found(username))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), AppError> {
        fetch_optional(
            pool,
            "DELETE FROM users WHERE username = $1 RETURNING username",
            &[Value::String(username.to_string())],
        )
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found(username))
    }
}
