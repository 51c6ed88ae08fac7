use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::UniqueViolation(db.message().to_string())
            }
            other => StorageError::Database(other),
        }
    }
}

/// Failures surfaced by the contact service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            // The only unique index is on email, so a constraint rejection
            // is always a duplicate-email conflict.
            StorageError::UniqueViolation(_) => {
                ApiError::Conflict("contact with this email already exists".to_string())
            }
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err: ApiError = StorageError::UniqueViolation("contacts_email_key".to_string()).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn other_storage_errors_stay_fatal() {
        let err: ApiError = StorageError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
