//! Companies: CRUD plus filtered listing.

use super::db::{constraint_error, fetch_all, fetch_optional};
use crate::error::AppError;
use crate::sql::{sql_for_filters, sql_for_partial_update, FieldNameMap, FilterField, FilterKind};
use serde_json::{Map, Value};
use sqlx::PgPool;

const FIELD_NAMES: &FieldNameMap<'static> = &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

/// Filters accepted by [`CompanyService::find_all`], in emission order.
pub const COMPANY_FILTERS: &[FilterField] = &[
    FilterField::new("nameLike", FilterKind::Contains, "name"),
    FilterField::new("minEmployees", FilterKind::AtLeast, "num_employees"),
    FilterField::new("maxEmployees", FilterKind::AtMost, "num_employees"),
];

const COLUMNS: &str = r#""handle", "name", "description", "num_employees", "logo_url""#;

fn duplicate(constraint: Option<&str>, handle: &str, data: &Map<String, Value>) -> String {
    match constraint {
        Some("companies_name_key") => format!(
            "Duplicate company name: {}",
            data.get("name").and_then(Value::as_str).unwrap_or_default()
        ),
        _ => format!("Duplicate company: {}", handle),
    }
}

pub struct CompanyService;

impl CompanyService {
    /// Insert a company. A taken handle is a conflict.
    pub async fn create(pool: &PgPool, body: &Map<String, Value>) -> Result<Value, AppError> {
        let handle = body.get("handle").and_then(Value::as_str).unwrap_or_default().to_string();
        let params: Vec<Value> = ["handle", "name", "description", "numEmployees", "logoUrl"]
            .iter()
            .map(|k| body.get(*k).cloned().unwrap_or(Value::Null))
            .collect();
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        fetch_optional(pool, &sql, &params)
            .await
            .map_err(|e| constraint_error(e, |c| duplicate(c, &handle, body), String::new))?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// All companies matching `filters`, ordered by name.
    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Value>, AppError> {
        let where_clause = sql_for_filters(filters, COMPANY_FILTERS)?;
        let sql = format!("SELECT {} FROM companies {} ORDER BY name", COLUMNS, where_clause.sql);
        fetch_all(pool, &sql, &where_clause.params).await
    }

    /// One company with its jobs.
    pub async fn get(pool: &PgPool, handle: &str) -> Result<Value, AppError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COLUMNS);
        let key = [Value::String(handle.to_string())];
        let mut company = fetch_optional(pool, &sql, &key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No company: {}", handle)))?;
        let jobs = fetch_all(
            pool,
            r#"SELECT "id", "title", "salary", "equity"::text AS "equity" FROM jobs WHERE company_handle = $1 ORDER BY id"#,
            &key,
        )
        .await?;
        if let Value::Object(obj) = &mut company {
            obj.insert("jobs".to_string(), Value::Array(jobs));
        }
        Ok(company)
    }

    /// Partial update; only the supplied fields change.
    pub async fn update(pool: &PgPool, handle: &str, data: &Map<String, Value>) -> Result<Value, AppError> {
        let set = sql_for_partial_update(data, FIELD_NAMES)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = {} RETURNING {}",
            set.sql,
            set.next_placeholder(),
            COLUMNS
        );
        let mut params = set.params;
        params.push(Value::String(handle.to_string()));
        fetch_optional(pool, &sql, &params)
            .await
            .map_err(|e| constraint_error(e, |c| duplicate(c, handle, data), String::new))?
            .ok_or_else(|| AppError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), AppError> {
        fetch_optional(
            pool,
            "DELETE FROM companies WHERE handle = $1 RETURNING handle",
            &[Value::String(handle.to_string())],
        )
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("No company: {}", handle)))
    }
}
