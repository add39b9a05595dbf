//! Jobly: a jobs and companies REST backend over PostgreSQL.
//!
//! The SQL fragment builders in [`sql`] turn client-supplied JSON into
//! parameterized `SET` and `WHERE` clauses; everything else wires them into
//! an axum service with token auth.

pub mod auth;
pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod schemas;
pub mod service;
pub mod sql;
pub mod state;

pub use config::Config;
pub use error::{AppError, ClauseError, ConfigError};
pub use routes::app;
pub use sql::{sql_for_filters, sql_for_partial_update, FieldNameMap, FilterField, FilterKind, SqlFragment};
pub use state::AppState;
