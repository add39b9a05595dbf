//! Parameterized SQL text plus the values bound to it.

use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: identifiers never come from clients).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// SQL text with `$1..$n` placeholders; `$N` binds `params[N - 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bound value and return its placeholder number.
    pub fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Placeholder for a value the caller binds after these params,
    /// e.g. the key in `UPDATE t SET <fragment> WHERE id = $n`.
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.params.len() + 1)
    }
}

#[cfg(test)]
pub(crate) fn distinct_placeholders(sql: &str) -> usize {
    let re = regex::Regex::new(r"\$(\d+)").unwrap();
    re.captures_iter(sql)
        .map(|c| c[1].to_string())
        .collect::<std::collections::HashSet<_>>()
        .len()
}
