//! Request extractors.

pub mod auth;
pub use auth::{Admin, AuthorizedUser, LoggedIn};
