//! Error types for graha-rg
//!
//! API failures surface as `{"status": "fail", "message": ...}` bodies with
//! the matching transport status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Critical facts unavailable; no meaningful document possible (422)
    #[error("Report cannot be generated: {0}")]
    UnprocessableReport(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// graha-common error
    #[error("{0}")]
    Common(#[from] graha_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UnprocessableReport(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Other(ref err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Common(err) => match err {
                graha_common::Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
                graha_common::Error::Provider(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
                graha_common::Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
            },
        };

        let body = Json(json!({
            "status": "fail",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let r = ApiError::BadRequest("x".into()).into_response();
        assert_eq!(r.status(), StatusCode::BAD_REQUEST);

        let r = ApiError::UnprocessableReport("x".into()).into_response();
        assert_eq!(r.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let r = ApiError::Common(graha_common::Error::InvalidInput("x".into())).into_response();
        assert_eq!(r.status(), StatusCode::BAD_REQUEST);
    }
}
