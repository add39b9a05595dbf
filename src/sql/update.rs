//! SET clause for partial updates.

use super::{quoted, SqlFragment};
use crate::error::ClauseError;
use serde_json::{Map, Value};

/// Logical field name -> column name. Fields not listed are used verbatim.
pub type FieldNameMap<'a> = [(&'a str, &'a str)];

fn column_for<'a>(field: &'a str, field_names: &[(&'a str, &'a str)]) -> &'a str {
    field_names
        .iter()
        .find(|(logical, _)| *logical == field)
        .map(|(_, column)| *column)
        .unwrap_or(field)
}

/// Build `"col_a" = $1, "col_b" = $2, ...` from `data`, in insertion order.
///
/// Values come back as bound parameters and are never spliced into the text.
/// The caller appends its own key parameter with [`SqlFragment::next_placeholder`].
pub fn sql_for_partial_update(
    data: &Map<String, Value>,
    field_names: &FieldNameMap<'_>,
) -> Result<SqlFragment, ClauseError> {
    if data.is_empty() {
        return Err(ClauseError::EmptyInput);
    }
    let mut q = SqlFragment::new();
    let mut sets = Vec::with_capacity(data.len());
    for (field, value) in data {
        let param_num = q.push_param(value.clone());
        sets.push(format!("{} = ${}", quoted(column_for(field, field_names)), param_num));
    }
    q.sql = sets.join(", ");
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::fragment::distinct_placeholders;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_maps_fields_in_insertion_order() {
        let data = map(json!({
            "handle": "new",
            "name": "New",
            "description": "New Description",
            "numEmployees": 1,
            "logoUrl": "http://new.img"
        }));
        let names = [("numEmployees", "num_employees"), ("logoUrl", "logo_url")];
        let q = sql_for_partial_update(&data, &names).unwrap();
        assert_eq!(
            q.sql,
            "\"handle\" = $1, \"name\" = $2, \"description\" = $3, \"num_employees\" = $4, \"logo_url\" = $5"
        );
        assert_eq!(
            q.params,
            vec![json!("new"), json!("New"), json!("New Description"), json!(1), json!("http://new.img")]
        );
    }

    #[test]
    fn test_unmapped_field_passes_through() {
        let data = map(json!({"numEmployees": 1, "logoUrl": "http://new.img"}));
        let q = sql_for_partial_update(&data, &[("logoUrl", "logo_url")]).unwrap();
        assert_eq!(q.sql, "\"numEmployees\" = $1, \"logo_url\" = $2");
    }

    #[test]
    fn test_insertion_order_wins_over_alphabetical() {
        let data = map(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let q = sql_for_partial_update(&data, &[]).unwrap();
        assert_eq!(q.sql, "\"zeta\" = $1, \"alpha\" = $2, \"mid\" = $3");
        assert_eq!(q.params, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_null_and_bool_values_are_bound() {
        let data = map(json!({"logoUrl": null, "isAdmin": true}));
        let q = sql_for_partial_update(&data, &[("logoUrl", "logo_url"), ("isAdmin", "is_admin")]).unwrap();
        assert_eq!(q.sql, "\"logo_url\" = $1, \"is_admin\" = $2");
        assert_eq!(q.params, vec![Value::Null, json!(true)]);
    }

    #[test]
    fn test_value_never_reaches_sql_text() {
        let data = map(json!({"name": "x'; DROP TABLE companies; --"}));
        let q = sql_for_partial_update(&data, &[]).unwrap();
        assert_eq!(q.sql, "\"name\" = $1");
        assert!(!q.sql.contains("DROP"));
    }

    #[test]
    fn test_empty_input_fails_regardless_of_map() {
        let empty = Map::new();
        assert_eq!(sql_for_partial_update(&empty, &[]), Err(ClauseError::EmptyInput));
        assert_eq!(
            sql_for_partial_update(&empty, &[("logoUrl", "logo_url")]),
            Err(ClauseError::EmptyInput)
        );
    }

    #[test]
    fn test_placeholder_count_matches_params() {
        let cases = [
            json!({"a": 1}),
            json!({"a": 1, "b": "two", "c": null}),
            json!({"firstName": "F", "lastName": "L", "email": "e@x.com", "isAdmin": false}),
        ];
        for case in cases {
            let q = sql_for_partial_update(&map(case), &[("firstName", "first_name")]).unwrap();
            assert_eq!(distinct_placeholders(&q.sql), q.params.len());
            assert_eq!(q.sql.split(", ").count(), q.params.len());
        }
    }
}
