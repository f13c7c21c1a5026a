// src/api/error.rs
// HTTP error responses. Every failure is `{ "message": ... }` with a matching status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::conversation::ResolveError;

#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::custom(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn custom(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            // Storage details stay in the logs
            ResolveError::Internal(e) => {
                error!("Conversation lookup failed: {:#}", e);
                ApiError::internal("Internal server error")
            }
            other => {
                let status = StatusCode::from_u16(other.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                ApiError::custom(status, other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "message": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::FORBIDDEN_MESSAGE;

    #[test]
    fn test_resolve_errors_map_to_statuses() {
        let cases = [
            (ResolveError::InvalidIdentifier, StatusCode::BAD_REQUEST),
            (ResolveError::Forbidden, StatusCode::FORBIDDEN),
            (ResolveError::NotFound, StatusCode::NOT_FOUND),
            (
                ResolveError::Internal(anyhow::anyhow!("disk I/O error")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code, status);
        }
    }

    #[test]
    fn test_forbidden_carries_share_guidance() {
        let api = ApiError::from(ResolveError::Forbidden);
        assert_eq!(api.message, FORBIDDEN_MESSAGE);
    }

    #[test]
    fn test_internal_hides_details() {
        let api = ApiError::from(ResolveError::Internal(anyhow::anyhow!("disk I/O error")));
        assert!(!api.message.contains("disk"));
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = ApiError::from(ResolveError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "message": "Conversation not found" }));
    }
}
