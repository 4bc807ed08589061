//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (malformed body, bad parameters)
    BadRequest(String),
    Internal(String),
    /// Failure reported by the engine
    Engine(EngineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Engine(e) => match &e {
                EngineError::Model(_) | EngineError::InvalidRequest(_) => (
                    StatusCode::BAD_REQUEST,
                    ApiError::new("INVALID_INPUT", e.to_string()),
                ),
                EngineError::Provider { date, .. } => (
                    StatusCode::BAD_GATEWAY,
                    ApiError::new("PROVIDER_ERROR", e.to_string())
                        .with_details(format!("date={}", date)),
                ),
                EngineError::Configuration(_) | EngineError::Internal(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("ENGINE_ERROR", e.to_string()),
                ),
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
