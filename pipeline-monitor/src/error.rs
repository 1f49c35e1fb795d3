//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::ingest::SourceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Auth errors
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthorized,
    #[error("access denied")]
    Forbidden,

    // Resource errors
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),

    // Validation errors
    #[error("{0}")]
    ValidationError(String),

    // Upstream errors
    #[error("inspection data source unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("inspection data source error: {0}")]
    ExternalServiceError(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Errors caused by the request itself. The read pipeline never
    /// replaces these with a fallback payload.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::NotFound(_)
                | AppError::Unauthorized
                | AppError::InvalidCredentials
                | AppError::Forbidden
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::InvalidCredentials => "Invalid username or password",
            AppError::Unauthorized => "Authentication required",
            AppError::Forbidden => "Access denied",
            AppError::NotFound(msg) => msg.as_str(),
            AppError::AlreadyExists(msg) => msg.as_str(),
            AppError::ValidationError(msg) => msg.as_str(),
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Inspection source unavailable: {}", msg);
                "Inspection data source unavailable"
            }
            AppError::ExternalServiceError(msg) => {
                tracing::error!("Inspection source error: {}", msg);
                "Inspection data source error"
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error"
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Network(msg) | SourceError::Unavailable(msg) => {
                AppError::UpstreamUnavailable(msg)
            }
            SourceError::Unauthorized => AppError::Unauthorized,
            SourceError::Rejected { status, message } => match status {
                400 | 422 => AppError::ValidationError(message),
                401 => AppError::Unauthorized,
                403 => AppError::Forbidden,
                404 => AppError::NotFound(message),
                409 => AppError::AlreadyExists(message),
                _ => AppError::ExternalServiceError(format!("upstream status {}: {}", status, message)),
            },
            SourceError::Parse(msg) => AppError::ExternalServiceError(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
