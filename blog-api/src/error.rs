//! HTTP error type
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! matching its kind. Internal failures are logged in full and answered with
//! a generic message so storage details never reach the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blog_chat::ChatError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned in place of internal error details
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors surfaced by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Validation failure: missing field, unknown version, malformed body
    #[error("{0}")]
    BadRequest(String),

    /// Referenced post does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (duplicate title)
    #[error("{0}")]
    Conflict(String),

    /// Anything unexpected; the detail is logged, not returned
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<blog_common::Error> for ApiError {
    fn from(err: blog_common::Error) -> Self {
        use blog_common::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        ApiError::Internal(format!("Chat error: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
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
    fn test_common_errors_map_to_status_kinds() {
        let err: ApiError = blog_common::Error::NotFound("gone".into()).into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "gone"));

        let err: ApiError = blog_common::Error::Conflict("dup".into()).into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = blog_common::Error::InvalidInput("bad".into()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = blog_common::Error::Config("broken".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_returned() {
        let response = ApiError::Internal("UNIQUE constraint failed: posts.title".into())
            .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}
