//! WHERE clause for list filters.
//!
//! Each model declares the filters it accepts as a table of [`FilterField`]s.
//! Raw values are resolved against that table into typed [`Filter`]s, bounds
//! are checked, and only then are clauses emitted. Clauses follow the order of
//! the field table, not the order of the input map, so the same set of
//! filters always yields the same SQL and placeholder numbering.

use super::{quoted, SqlFragment};
use crate::error::ClauseError;
use serde_json::{Map, Number, Value};

/// The closed set of filter shapes a model can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring match.
    Contains,
    /// Inclusive lower bound.
    AtLeast,
    /// Inclusive upper bound.
    AtMost,
    /// `true` keeps rows whose column is above zero; `false` adds nothing.
    Positive,
}

/// One accepted filter key and the column it applies to.
#[derive(Clone, Copy, Debug)]
pub struct FilterField {
    pub key: &'static str,
    pub kind: FilterKind,
    pub column: &'static str,
}

impl FilterField {
    pub const fn new(key: &'static str, kind: FilterKind, column: &'static str) -> Self {
        FilterField { key, kind, column }
    }
}

/// A filter value after resolution against its [`FilterKind`].
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Contains(String),
    AtLeast(Number),
    AtMost(Number),
    Positive(bool),
}

/// Best-effort numeric coercion: JSON numbers as-is, numeric strings parsed.
fn coerce_number(v: &Value) -> Option<Number> {
    match v {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Number::from(i))
            } else {
                s.parse::<f64>().ok().and_then(Number::from_f64)
            }
        }
        _ => None,
    }
}

fn coerce_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

impl Filter {
    /// Resolve a raw value for a field of the given kind. `None` when the value is unusable.
    pub fn resolve(kind: FilterKind, v: &Value) -> Option<Filter> {
        match kind {
            FilterKind::Contains => match v {
                Value::String(s) => Some(Filter::Contains(s.clone())),
                Value::Number(n) => Some(Filter::Contains(n.to_string())),
                _ => None,
            },
            FilterKind::AtLeast => coerce_number(v).map(Filter::AtLeast),
            FilterKind::AtMost => coerce_number(v).map(Filter::AtMost),
            FilterKind::Positive => coerce_bool(v).map(Filter::Positive),
        }
    }
}

fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

/// Any lower bound above an upper bound on the same column is a client error.
fn check_bounds(resolved: &[(&FilterField, Filter)]) -> Result<(), ClauseError> {
    for (lo_field, lo) in resolved {
        let Filter::AtLeast(lo) = lo else { continue };
        for (hi_field, hi) in resolved {
            if let Filter::AtMost(hi) = hi {
                if hi_field.column == lo_field.column && as_f64(lo) > as_f64(hi) {
                    return Err(ClauseError::InconsistentBounds);
                }
            }
        }
    }
    Ok(())
}

/// Build `WHERE <clause> AND <clause> ...` from `filters`, or an empty fragment when nothing applies.
///
/// Keys not declared in `fields`, and declared keys whose value cannot be
/// coerced, are skipped. Validation of the key set belongs to the caller.
pub fn sql_for_filters(
    filters: &Map<String, Value>,
    fields: &[FilterField],
) -> Result<SqlFragment, ClauseError> {
    for key in filters.keys() {
        if !fields.iter().any(|f| f.key == key) {
            tracing::debug!(key = %key, "unrecognized filter ignored");
        }
    }

    let mut resolved: Vec<(&FilterField, Filter)> = Vec::new();
    for field in fields {
        let Some(raw) = filters.get(field.key) else { continue };
        match Filter::resolve(field.kind, raw) {
            Some(filter) => resolved.push((field, filter)),
            None => tracing::debug!(key = field.key, value = %raw, "filter value not usable, ignored"),
        }
    }
    check_bounds(&resolved)?;

    let mut q = SqlFragment::new();
    let mut where_parts = Vec::new();
    for (field, filter) in resolved {
        let col = quoted(field.column);
        match filter {
            Filter::Contains(s) => {
                let param_num = q.push_param(Value::String(format!("%{}%", s)));
                where_parts.push(format!("{} ILIKE ${}", col, param_num));
            }
            Filter::AtLeast(n) => {
                let param_num = q.push_param(Value::Number(n));
                where_parts.push(format!("{} >= ${}", col, param_num));
            }
            Filter::AtMost(n) => {
                let param_num = q.push_param(Value::Number(n));
                where_parts.push(format!("{} <= ${}", col, param_num));
            }
            Filter::Positive(true) => where_parts.push(format!("{} > 0", col)),
            Filter::Positive(false) => {}
        }
    }
    if !where_parts.is_empty() {
        q.sql = format!("WHERE {}", where_parts.join(" AND "));
    }
    Ok(q)
}
