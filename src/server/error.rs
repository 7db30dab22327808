use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;

/// HTTP-facing error taxonomy. Internal failures carry details for the
/// response body; not-found and access-denied stay terse.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Access denied")]
    AccessDenied,

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Internal { message: String, details: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, details: impl Display) -> Self {
        Self::Internal {
            message: message.into(),
            details: details.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::AccessDenied => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Access denied" })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
        }
    }
}
