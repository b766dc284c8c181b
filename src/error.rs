use std::error::Error;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Result alias for service contract calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised by the external service contracts and the actions wrapping them.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No endpoint (or other prerequisite) is available yet.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// Reading or writing local settings failed.
    #[error("persistence failed: {message}")]
    Persistence {
        /// What was being persisted.
        message: String,
        /// Underlying IO or serialization failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A remote call failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ServiceError {
    /// Construct a persistence error from any storage failure.
    pub fn persistence(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        ServiceError::Persistence {
            message: message.into(),
            source: Box::new(source),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Service unavailable or an upstream failed.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(message) => AppError::ServiceUnavailable(message),
            ServiceError::Http(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Persistence { message, .. } => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
