//! Application error type mapping to HTTP status codes.
//!
//! Error bodies use the `{"detail": "..."}` envelope.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use visabot_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat relay errors that escaped the fallback path.
    Chat(ChatError),
    /// Request body could not be parsed as a chat request.
    Body(JsonRejection),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Body(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Chat(e @ ChatError::EmptyMessage) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Chat(e) => {
                tracing::error!(error = %e, "Unhandled chat error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
        };

        (status, axum::Json(json!({ "detail": detail }))).into_response()
    }
}
