//! Handler errors and their HTTP representation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::claude::ClaudeApiError;

pub const DAILY_LIMIT_MESSAGE: &str = "daily limit reached, try again tomorrow";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("daily limit reached ({current_count}/{daily_limit})")]
    QuotaExceeded { current_count: u32, daily_limit: u32 },
    #[error("tutor failed: {0}")]
    Tutor(#[from] ClaudeApiError),
    #[error("tutor queue is closed")]
    QueueClosed,
    #[error("tutor worker dropped the request")]
    WorkerDropped,
    #[error("unexpected reply from tutor worker")]
    UnexpectedReply,
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Tutor(ClaudeApiError::RateLimited) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Tutor(_) | ApiError::UnexpectedReply => StatusCode::BAD_GATEWAY,
            ApiError::QueueClosed | ApiError::WorkerDropped => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::QuotaExceeded {
                current_count,
                daily_limit,
            } => json!({
                "error": DAILY_LIMIT_MESSAGE,
                "dailyLimitReached": true,
                "currentCount": current_count,
                "dailyLimit": daily_limit,
            }),
            other => {
                if status.is_server_error() {
                    tracing::error!(status = status.as_u16(), "{}", other);
                } else {
                    tracing::warn!(status = status.as_u16(), "{}", other);
                }
                json!({ "error": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::QuotaExceeded { current_count: 100, daily_limit: 100 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(ApiError::Tutor(ClaudeApiError::Timeout).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Tutor(ClaudeApiError::RateLimited).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }
}
