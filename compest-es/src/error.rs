//! API error type and its JSON rendering

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::valuation::EstimateError;

/// API error type
///
/// Rendered as `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is well-formed but a field is out of range (422)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request body could not be parsed (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No comp matched the subject's property type (404)
    #[error("No comparable properties found")]
    NoComparablesFound,

    /// Comp source failed (502)
    #[error("Comp retrieval failed: {0}")]
    RetrievalFailed(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// compest-common error
    #[error("Common error: {0}")]
    Common(#[from] compest_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NoComparablesFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RetrievalFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) | ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NoComparablesFound => "NO_COMPARABLES_FOUND",
            ApiError::RetrievalFailed(_) => "RETRIEVAL_FAILED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) | ApiError::Common(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<EstimateError> for ApiError {
    fn from(err: EstimateError) -> Self {
        match err {
            EstimateError::Validation(e) => ApiError::Validation(e.to_string()),
            EstimateError::NoComparablesFound => ApiError::NoComparablesFound,
            EstimateError::Retrieval(e) => {
                warn!(error = %format!("{:#}", e), "Comp source failed");
                ApiError::RetrievalFailed(format!("{:#}", e))
            }
            EstimateError::InvariantViolation(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::Validation(e.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::Validation(msg)
            | ApiError::BadRequest(msg)
            | ApiError::RetrievalFailed(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => msg,
            ApiError::NoComparablesFound => "No comparable properties found".to_string(),
            ApiError::Common(ref err) => err.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
