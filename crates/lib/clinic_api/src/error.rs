//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_core::auth::AuthError;
use clinic_core::rbac::AuthzError;
use clinic_core::references::ReferenceError;
use clinic_core::store::StoreError;
use clinic_core::treatments::TreatmentError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database unavailable: {0}")]
    DbUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Always rendered as the bare message `Forbidden`.
    #[error("Forbidden")]
    Forbidden,

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m.as_str()),
            AppError::DbUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "db_unavailable",
                "Database unavailable",
            ),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", "Forbidden"),
            AppError::Internal(m) => {
                error!(error = %m, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::DbUnavailable(e.to_string())
            }
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Database(e) => AppError::from(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::Unauthenticated(msg) => AppError::Unauthorized(msg),
            AuthError::AlreadyExists => AppError::Conflict("Email already exists".into()),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::TokenError(msg) => AppError::Internal(msg),
            AuthError::Store(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthzError> for AppError {
    fn from(e: AuthzError) -> Self {
        match e {
            AuthzError::Forbidden => AppError::Forbidden,
        }
    }
}

impl From<ReferenceError> for AppError {
    fn from(e: ReferenceError) -> Self {
        match e {
            ReferenceError::NotFound(_) => AppError::NotFound(e.to_string()),
            ReferenceError::Store(e) => AppError::from(e),
        }
    }
}

impl From<TreatmentError> for AppError {
    fn from(e: TreatmentError) -> Self {
        match e {
            TreatmentError::NotFound(_) | TreatmentError::PatientNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            TreatmentError::ValidationError(msg) => AppError::Validation(msg),
            TreatmentError::Reference(e) => AppError::from(e),
            TreatmentError::Store(e) => AppError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use clinic_core::models::clinic::CatalogKind;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn forbidden_has_fixed_message() {
        let (status, body) = render(AuthzError::Forbidden.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Forbidden");
    }

    #[tokio::test]
    async fn reference_failure_is_not_found_with_collection_message() {
        let err = ReferenceError::NotFound(CatalogKind::Medication);
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "One or more medications not found");
    }

    #[tokio::test]
    async fn internal_message_is_hidden() {
        let (status, body) = render(AppError::Internal("secret detail".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn auth_errors_map_to_expected_statuses() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AuthError::Unauthenticated("token expired".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::AlreadyExists, StatusCode::CONFLICT),
            (
                AuthError::ValidationError("short".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = render(err.into()).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn pool_timeout_is_service_unavailable() {
        let (status, _) = render(sqlx::Error::PoolTimedOut.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
