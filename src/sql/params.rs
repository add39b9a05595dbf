//! Convert serde_json::Value to types that sqlx can bind.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query. Converts from serde_json::Value.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Json(Value),
}

impl From<&Value> for PgBindValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map(PgBindValue::I64)
                .or_else(|| n.as_f64().map(PgBindValue::F64))
                .unwrap_or(PgBindValue::Null),
            Value::String(s) => PgBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Json(v.clone()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            PgBindValue::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    /// Each variant declares its own wire type so the server sees int8/float8/bool, not text.
    /// The type differs per value, so statements binding these are run uncached.
    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::F64(_) => <f64 as Type<Postgres>>::type_info(),
            PgBindValue::String(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Json(_) => <Value as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
