//! Jobs: CRUD plus filtered listing. `equity` is NUMERIC and comes back as text.

use super::db::{constraint_error, fetch_all, fetch_optional};
use crate::error::AppError;
use crate::sql::{sql_for_filters, sql_for_partial_update, FieldNameMap, FilterField, FilterKind};
use serde_json::{Map, Value};
use sqlx::PgPool;

const FIELD_NAMES: &FieldNameMap<'static> = &[("companyHandle", "company_handle")];

/// Filters accepted by [`JobService::find_all`], in emission order.
pub const JOB_FILTERS: &[FilterField] = &[
    FilterField::new("title", FilterKind::Contains, "title"),
    FilterField::new("minSalary", FilterKind::AtLeast, "salary"),
    FilterField::new("hasEquity", FilterKind::Positive, "equity"),
];

const COLUMNS: &str = r#""id", "title", "salary", "equity"::text AS "equity", "company_handle""#;

pub struct JobService;

impl JobService {
    /// Insert a job. An unknown company handle is a client error.
    pub async fn create(pool: &PgPool, body: &Map<String, Value>) -> Result<Value, AppError> {
        let handle = body.get("companyHandle").and_then(Value::as_str).unwrap_or_default().to_string();
        let params: Vec<Value> = ["title", "salary", "equity", "companyHandle"]
            .iter()
            .map(|k| body.get(*k).cloned().unwrap_or(Value::Null))
            .collect();
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        );
        fetch_optional(pool, &sql, &params)
            .await
            .map_err(|e| constraint_error(e, |_| String::new(), || format!("No company: {}", handle)))?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// All jobs matching `filters`, ordered by title.
    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Value>, AppError> {
        let where_clause = sql_for_filters(filters, JOB_FILTERS)?;
        let sql = format!("SELECT {} FROM jobs {} ORDER BY title, id", COLUMNS, where_clause.sql);
        fetch_all(pool, &sql, &where_clause.params).await
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Value, AppError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS);
        fetch_optional(pool, &sql, &[Value::from(id)])
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No job: {}", id)))
    }

    /// Partial update; only the supplied fields change.
    pub async fn update(pool: &PgPool, id: i64, data: &Map<String, Value>) -> Result<Value, AppError> {
        let set = sql_for_partial_update(data, FIELD_NAMES)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {}",
            set.sql,
            set.next_placeholder(),
            COLUMNS
        );
        let mut params = set.params;
        params.push(Value::from(id));
        fetch_optional(pool, &sql, &params)
            .await
            .map_err(|e| constraint_error(e, |_| String::new(), String::new))?
            .ok_or_else(|| AppError::NotFound(format!("No job: {}", id)))
    }

    /// Delete a job, returning its `id` and `title`.
    pub async fn remove(pool: &PgPool, id: i64) -> Result<Value, AppError> {
        fetch_optional(pool, "DELETE FROM jobs WHERE id = $1 RETURNING id, title", &[Value::from(id)])
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No job: {}", id)))
    }
}
