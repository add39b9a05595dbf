//! Query execution against PostgreSQL: bind JSON params, return rows as camelCase JSON objects.

use crate::case::object_keys_to_camel_case;
use crate::error::AppError;
use crate::sql::PgBindValue;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

/// Unnamed statement with every value bound.
///
/// Statements are not cached per connection: the same text is reused with
/// values of different wire types (`null` vs int vs float), and a cached
/// statement would keep the parameter types of its first execution.
fn prepare<'q>(sql: &'q str, params: &[Value]) -> Query<'q, Postgres, PgArguments> {
    params
        .iter()
        .fold(sqlx::query(sql).persistent(false), |q, p| q.bind(PgBindValue::from(p)))
}

pub(crate) async fn fetch_all(pool: &PgPool, sql: &str, params: &[Value]) -> Result<Vec<Value>, AppError> {
    tracing::debug!(sql = %sql, params = ?params, "query");
    let rows = prepare(sql, params).fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

pub(crate) async fn fetch_optional(pool: &PgPool, sql: &str, params: &[Value]) -> Result<Option<Value>, AppError> {
    tracing::debug!(sql = %sql, params = ?params, "query");
    let row = prepare(sql, params).fetch_optional(pool).await?;
    Ok(row.map(|r| row_to_json(&r)))
}

/// Constraint and data errors a client can cause with a well-formed request.
#[derive(Debug, PartialEq, Eq)]
enum Violation {
    Unique,
    ForeignKey,
    /// CHECK constraint, string too long, integer out of range.
    BadValue,
}

fn violation(sqlstate: &str) -> Option<Violation> {
    match sqlstate {
        "23505" => Some(Violation::Unique),
        "23503" => Some(Violation::ForeignKey),
        "23514" | "22001" | "22003" => Some(Violation::BadValue),
        _ => None,
    }
}

/// Translate constraint violations into client errors; everything else stays a database error.
///
/// `conflict` receives the name of the violated unique constraint, if the server reported one.
pub(crate) fn constraint_error(
    e: AppError,
    conflict: impl FnOnce(Option<&str>) -> String,
    missing_ref: impl FnOnce() -> String,
) -> AppError {
    if let AppError::Db(sqlx::Error::Database(db)) = &e {
        match db.code().as_deref().and_then(violation) {
            Some(Violation::Unique) => return AppError::Conflict(conflict(db.constraint())),
            Some(Violation::ForeignKey) => return AppError::BadRequest(missing_ref()),
            Some(Violation::BadValue) => return AppError::BadRequest(db.message().to_string()),
            None => {}
        }
    }
    e
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::{Column, Row};
    let mut map = Map::new();
    for col in row.columns() {
        map.insert(col.name().to_string(), cell_to_value(row, col));
    }
    object_keys_to_camel_case(&mut map);
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, col: &sqlx::postgres::PgColumn) -> Value {
    use sqlx::{Column, Row, TypeInfo};
    let i = col.ordinal();
    let decoded = match col.type_info().name() {
        "INT2" => row.try_get::<Option<i16>, _>(i).map(|v| v.map(Value::from)),
        "INT4" => row.try_get::<Option<i32>, _>(i).map(|v| v.map(Value::from)),
        "INT8" => row.try_get::<Option<i64>, _>(i).map(|v| v.map(Value::from)),
        "FLOAT4" => row.try_get::<Option<f32>, _>(i).map(|v| v.map(|n| Value::from(f64::from(n)))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(i).map(|v| v.map(Value::from)),
        "BOOL" => row.try_get::<Option<bool>, _>(i).map(|v| v.map(Value::Bool)),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(i),
        _ => row.try_get::<Option<String>, _>(i).map(|v| v.map(Value::String)),
    };
    match decoded {
        Ok(v) => v.unwrap_or(Value::Null),
        Err(e) => {
            tracing::warn!(column = col.name(), error = %e, "column not decodable, returning null");
            Value::Null
        }
    }
}
