//! Error types for the Salesboard server.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// IO error.
    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Salesboard core error.
    #[error("Core error: {0}")]
    Core(#[from] salesboard_core::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!("Request failed: {}", self);
        (status, self.to_string()).into_response()
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
