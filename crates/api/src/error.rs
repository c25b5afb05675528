//! API error handling
//!
//! Consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use github::ClientError;
use serde::Serialize;
use tracing::error;

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// API error type that converts to JSON responses
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request parameters
    BadRequest(String),
    /// Repository not found
    NotFound(String),
    /// GitHub rejected the configured token
    Unauthorized,
    /// GitHub API rate limited
    RateLimited(u64),
    /// GitHub API error
    GitHub(String),
    /// Server misconfiguration
    Config(String),
}

impl ApiError {
    fn parts(self) -> (StatusCode, ErrorResponse) {
        let plain = |status: StatusCode, error: String, code: &str| {
            (
                status,
                ErrorResponse {
                    error,
                    code: Some(code.to_string()),
                    retry_after_secs: None,
                },
            )
        };

        match self {
            ApiError::BadRequest(msg) => plain(StatusCode::BAD_REQUEST, msg, "bad_request"),
            ApiError::NotFound(msg) => plain(StatusCode::NOT_FOUND, msg, "not_found"),
            ApiError::Unauthorized => plain(
                StatusCode::UNAUTHORIZED,
                "Invalid GitHub token".to_string(),
                "unauthorized",
            ),
            ApiError::RateLimited(retry_after) => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    error: "API rate limit exceeded".to_string(),
                    code: Some("rate_limited".to_string()),
                    retry_after_secs: Some(retry_after),
                },
            ),
            ApiError::GitHub(msg) => {
                error!("GitHub API error: {}", msg);
                plain(
                    StatusCode::BAD_GATEWAY,
                    "Failed to fetch repository data".to_string(),
                    "github_error",
                )
            }
            ApiError::Config(msg) => {
                error!("Configuration error: {}", msg);
                plain(StatusCode::INTERNAL_SERVER_ERROR, msg, "config_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = self.parts();
        (status, Json(response)).into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(what) => ApiError::NotFound(format!("Repository {} not found", what)),
            ClientError::Unauthorized => ApiError::Unauthorized,
            ClientError::RateLimited { retry_after } => ApiError::RateLimited(retry_after),
            other => ApiError::GitHub(other.to_string()),
        }
    }
}

impl From<common::Error> for ApiError {
    fn from(err: common::Error) -> Self {
        match err {
            common::Error::Config(msg) => ApiError::Config(msg),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).parts().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).parts().0, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthorized.parts().0, StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::RateLimited(30).parts().0,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::GitHub("boom".into()).parts().0,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Config("x".into()).parts().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limit_carries_retry_after() {
        let (_, body) = ApiError::RateLimited(42).parts();
        assert_eq!(body.retry_after_secs, Some(42));
        assert_eq!(body.code.as_deref(), Some("rate_limited"));
    }

    #[test]
    fn test_client_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(ClientError::NotFound("a/b".into())),
            ApiError::NotFound(msg) if msg == "Repository a/b not found"
        ));
        assert!(matches!(
            ApiError::from(ClientError::Unauthorized),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(ClientError::RateLimited { retry_after: 7 }),
            ApiError::RateLimited(7)
        ));
        assert!(matches!(
            ApiError::from(ClientError::GraphQl("bad".into())),
            ApiError::GitHub(_)
        ));
    }

    #[test]
    fn test_missing_token_is_server_error() {
        let err = ApiError::from(common::Error::Config("GitHub token required".into()));
        let (status, body) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "GitHub token required");
    }
}
