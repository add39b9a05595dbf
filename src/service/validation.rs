//! Request validation against static per-endpoint rule sets.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid built-in email regex"))
}

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("invalid built-in URL regex"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    fn describe(self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Integer => "an integer",
            FieldType::Number => "a number",
            FieldType::Boolean => "a boolean",
        }
    }

    fn matches(self, v: &Value) -> bool {
        match self {
            FieldType::String => v.is_string(),
            FieldType::Integer => v.is_i64() || v.is_u64(),
            FieldType::Number => v.is_number(),
            FieldType::Boolean => v.is_boolean(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    Url,
}

/// Constraints on one property of a request body or query.
#[derive(Clone, Copy, Debug)]
pub struct ValidationRule {
    pub field: &'static str,
    pub kind: FieldType,
    pub required: bool,
    pub nullable: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub format: Option<Format>,
    pub lowercase: bool,
}

impl ValidationRule {
    const fn of(field: &'static str, kind: FieldType) -> Self {
        ValidationRule {
            field,
            kind,
            required: false,
            nullable: false,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            format: None,
            lowercase: false,
        }
    }

    pub const fn string(field: &'static str) -> Self {
        Self::of(field, FieldType::String)
    }

    pub const fn integer(field: &'static str) -> Self {
        Self::of(field, FieldType::Integer)
    }

    pub const fn number(field: &'static str) -> Self {
        Self::of(field, FieldType::Number)
    }

    pub const fn boolean(field: &'static str) -> Self {
        Self::of(field, FieldType::Boolean)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub const fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub const fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    pub const fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Reject strings containing uppercase characters.
    pub const fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }
}

/// Rules for one request shape. Properties without a rule are rejected.
#[derive(Debug)]
pub struct RequestSchema {
    pub name: &'static str,
    pub rules: &'static [ValidationRule],
}

impl RequestSchema {
    fn rule(&self, field: &str) -> Option<&ValidationRule> {
        self.rules.iter().find(|r| r.field == field)
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate `body` against `schema`, collecting every violation.
    pub fn validate(body: &Map<String, Value>, schema: &RequestSchema) -> Result<(), AppError> {
        let mut errors = Vec::new();
        for key in body.keys() {
            if schema.rule(key).is_none() {
                errors.push(format!("{} is not allowed", key));
            }
        }
        for rule in schema.rules {
            match body.get(rule.field) {
                None if rule.required => errors.push(format!("{} is required", rule.field)),
                None => {}
                Some(v) => validate_field(rule, v, &mut errors),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(schema = schema.name, ?errors, "request rejected");
            Err(AppError::Validation(errors))
        }
    }

    /// Turn query-string pairs into JSON values typed per `schema`, ready for [`Self::validate`].
    /// Values that do not parse stay strings so validation reports them.
    pub fn coerce_query<I>(params: I, schema: &RequestSchema) -> Map<String, Value>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        params
            .into_iter()
            .map(|(k, s)| {
                let v = match schema.rule(&k).map(|r| r.kind) {
                    Some(FieldType::Integer) => s
                        .trim()
                        .parse::<i64>()
                        .map(|n| Value::Number(n.into()))
                        .unwrap_or(Value::String(s)),
                    Some(FieldType::Number) => s
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::String(s)),
                    Some(FieldType::Boolean) if s.eq_ignore_ascii_case("true") => Value::Bool(true),
                    Some(FieldType::Boolean) if s.eq_ignore_ascii_case("false") => Value::Bool(false),
                    _ => Value::String(s),
                };
                (k, v)
            })
            .collect()
    }
}

fn validate_field(rule: &ValidationRule, v: &Value, errors: &mut Vec<String>) {
    let col = rule.field;
    if v.is_null() {
        if !rule.nullable {
            errors.push(format!("{} must be {}", col, rule.kind.describe()));
        }
        return;
    }
    if !rule.kind.matches(v) {
        errors.push(format!("{} must be {}", col, rule.kind.describe()));
        return;
    }
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(min) = rule.min_length {
            if len < min {
                errors.push(format!("{} must be at least {} characters", col, min));
            }
        }
        if let Some(max) = rule.max_length {
            if len > max {
                errors.push(format!("{} must be at most {} characters", col, max));
            }
        }
        if let Some(format) = rule.format {
            validate_format(col, s, format, errors);
        }
        if rule.lowercase && s.chars().any(char::is_uppercase) {
            errors.push(format!("{} must be lowercase", col));
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                errors.push(format!("{} must be at least {}", col, min));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                errors.push(format!("{} must be at most {}", col, max));
            }
        }
    }
}

fn validate_format(col: &str, s: &str, format: Format, errors: &mut Vec<String>) {
    let (re, what) = match format {
        Format::Email => (email_regex(), "email"),
        Format::Url => (url_regex(), "URL"),
    };
    if !re.is_match(s) {
        errors.push(format!("{} must be a valid {}", col, what));
    }
}
