use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::tracker::TrackerError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Conflict(&'static str, String),
    Upstream(String),
    Internal(String),
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::InvalidIdentifier => ApiError::Validation(e.to_string()),
            TrackerError::AlreadyTracked(_) => ApiError::Conflict("already_tracked", e.to_string()),
            TrackerError::DuplicateIdentifier(_) => {
                ApiError::Conflict("duplicate_identifier", e.to_string())
            }
            TrackerError::FetchFailed(_) => ApiError::Upstream(e.to_string()),
            TrackerError::InvalidClockStep(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("invalid_identifier", &msg)),
            )
                .into_response(),
            ApiError::Conflict(reason, msg) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::with_message(reason, &msg)),
            )
                .into_response(),
            ApiError::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("fetch_failed", &msg)),
            )
                .into_response(),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("internal_error", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
