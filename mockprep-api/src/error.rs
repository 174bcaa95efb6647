//! Error types for mockprep-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mockprep_common::evaluation::PayloadError;
use serde_json::json;
use thiserror::Error;

use crate::llm::LlmError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409), e.g. answering a question twice
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// The AI service returned something unusable (500)
    #[error("AI response rejected: {0}")]
    AiPayload(#[from] PayloadError),

    /// The AI service could not be reached (500)
    #[error("AI service error: {0}")]
    Upstream(#[from] LlmError),

    /// mockprep-common error
    #[error("Common error: {0}")]
    Common(#[from] mockprep_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Common(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::AiPayload(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI_RESPONSE_INVALID",
                err.to_string(),
            ),
            ApiError::Upstream(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI_UNAVAILABLE",
                err.to_string(),
            ),
            ApiError::Common(mockprep_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(mockprep_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
