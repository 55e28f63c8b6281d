use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed requirement, candidate or command input. Rejected before any computation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A requirement or candidate source could not be reached. Recoverable; the
    /// existing analysis session is left untouched.
    #[error("{upstream} unavailable: {message}")]
    UpstreamUnavailable { upstream: String, message: String },

    /// A durable write failed. The in-memory state stays authoritative.
    #[error("Failed to persist session during {operation}: {message}")]
    PersistenceFailure { operation: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(upstream: impl Into<String>, message: impl ToString) -> Self {
        AppError::UpstreamUnavailable {
            upstream: upstream.into(),
            message: message.to_string(),
        }
    }

    pub fn persistence(operation: impl Into<String>, message: impl ToString) -> Self {
        AppError::PersistenceFailure {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UpstreamUnavailable { .. } => {
                tracing::warn!("{self}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_UNAVAILABLE",
                    format!("{self}. Please retry."),
                )
            }
            AppError::PersistenceFailure { .. } => {
                tracing::error!("{self}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "PERSISTENCE_FAILURE",
                    self.to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
