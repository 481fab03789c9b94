// src/presentation/http/controllers/mod.rs
pub mod auth;
pub mod clients;
pub mod session;
pub mod users;

use crate::application::error::ApplicationError;
use crate::presentation::http::error::HttpError;

/// Unwrap a required body field, treating blank strings as absent.
pub(crate) fn require_field(value: Option<String>, name: &str) -> Result<String, HttpError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(HttpError::from_error(ApplicationError::missing_field(name))),
    }
}
