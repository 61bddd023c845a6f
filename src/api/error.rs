//! API error types and conversions

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Storage operation failed
    StorageError(String),

    /// Invalid request parameters
    InvalidRequest(String),
}

impl ApiError {
    /// Map an ingestion failure to its client-facing reason
    pub fn ingest(err: Error) -> Self {
        match err {
            Error::Validation(e) => ApiError::InvalidRequest(e.reason().to_string()),
            Error::Persistence(_) => ApiError::StorageError("Failed to store alert".to_string()),
        }
    }

    /// Map a dashboard query failure to its client-facing reason
    pub fn query(err: Error) -> Self {
        match err {
            Error::Validation(e) => ApiError::InvalidRequest(e.reason().to_string()),
            Error::Persistence(_) => {
                ApiError::StorageError("Failed to query alerts".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        ApiError::StorageError(err.to_string())
    }
}
