//! Runtime settings from environment variables.

use crate::error::ConfigError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 signing key for auth tokens.
    pub secret_key: String,
    pub port: u16,
    pub database_url: String,
    pub bcrypt_work_factor: u32,
    pub token_ttl_hours: i64,
    pub body_limit_bytes: usize,
}

fn parsed<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

impl Config {
    /// Load from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            secret_key: lookup("SECRET_KEY").unwrap_or_else(|| "secret-dev".into()),
            port: parsed("PORT", lookup("PORT"), 3001)?,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "postgresql:///jobly".into()),
            bcrypt_work_factor: parsed("BCRYPT_WORK_FACTOR", lookup("BCRYPT_WORK_FACTOR"), 12)?,
            token_ttl_hours: parsed("TOKEN_TTL_HOURS", lookup("TOKEN_TTL_HOURS"), 24)?,
            body_limit_bytes: parsed("BODY_LIMIT_BYTES", lookup("BODY_LIMIT_BYTES"), 1024 * 1024)?,
        })
    }

    /// Defaults with the cheapest bcrypt cost, for tests.
    pub fn for_tests() -> Self {
        Config {
            secret_key: "secret-test".into(),
            port: 0,
            database_url: "postgresql:///jobly_test".into(),
            bcrypt_work_factor: 4,
            token_ttl_hours: 1,
            body_limit_bytes: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| m.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let c = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(c.secret_key, "secret-dev");
        assert_eq!(c.port, 3001);
        assert_eq!(c.database_url, "postgresql:///jobly");
        assert_eq!(c.bcrypt_work_factor, 12);
        assert_eq!(c.token_ttl_hours, 24);
    }

    #[test]
    fn test_overrides() {
        let c = Config::from_lookup(lookup(&[("PORT", "8080"), ("SECRET_KEY", "k"), ("BCRYPT_WORK_FACTOR", " 5 ")])).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.secret_key, "k");
        assert_eq!(c.bcrypt_work_factor, 5);
    }

    #[test]
    fn test_bad_number_is_reported() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
        assert_eq!(err.to_string(), "invalid value for PORT: 'eighty'");
    }
}
