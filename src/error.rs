use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Main error type for the log tail service
#[derive(Debug, Error)]
pub enum LogtailError {
    // Request validation errors
    #[error("Unknown log service '{requested}'. Available: {}", .available.join(", "))]
    UnknownService {
        requested: String,
        available: Vec<String>,
    },

    #[error("Line count must be between {min} and {max}, got {value}")]
    InvalidLineCount { value: i64, min: usize, max: usize },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    // Log directory errors
    #[error("Log directory error: {0}")]
    LogDirError(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration field: {0}")]
    MissingConfigField(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // Server errors
    #[error("Server error: {0}")]
    ServerError(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogtailError {
    /// HTTP status this error maps to when it reaches a client
    pub fn status_code(&self) -> StatusCode {
        match self {
            LogtailError::UnknownService { .. } => StatusCode::NOT_FOUND,
            LogtailError::InvalidLineCount { .. } | LogtailError::InvalidQuery(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LogtailError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side faults are logged in full but sanitized for the client
        let detail = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type alias for log tail operations
pub type Result<T> = std::result::Result<T, LogtailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_message_lists_available() {
        let err = LogtailError::UnknownService {
            requested: "db".to_string(),
            available: vec!["backend".to_string(), "frontend".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Unknown log service 'db'. Available: backend, frontend"
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_status_codes() {
        let err = LogtailError::InvalidLineCount {
            value: 2001,
            min: 1,
            max: 2000,
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = LogtailError::LogDirError("not writable".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
