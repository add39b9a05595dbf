//! Case conversion for API responses: database snake_case keys -> client camelCase keys.

use serde_json::{Map, Value};

/// Convert a single identifier from snake_case to camelCase.
/// e.g. "num_employees" -> "numEmployees", "company_handle" -> "companyHandle"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert all keys of a JSON object from snake_case to camelCase, keeping key order.
pub fn object_keys_to_camel_case(obj: &mut Map<String, Value>) {
    *obj = std::mem::take(obj)
        .into_iter()
        .map(|(k, v)| (to_camel_case(&k), v))
        .collect();
}
