//! Service flows behind the handlers.

pub mod auth;
pub mod catalog;
pub mod patients;
pub mod treatments;
pub mod users;

use crate::error::AppError;

/// Trim a required text field, rejecting blank values.
pub(crate) fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// [`required`] for fields that may be omitted.
pub(crate) fn optional(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    value.map(|v| required(field, &v)).transpose()
}
