//! Client error types

use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with the server's message, if it sent one
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized(Option<String>),

    /// Permission denied
    #[error("Permission denied")]
    Forbidden(Option<String>),

    /// Resource not found
    #[error("Not found")]
    NotFound(Option<String>),

    /// Rejected locally before any request was sent
    #[error("{0}")]
    Validation(#[from] AppError),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The owning view was torn down before the result arrived
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Build the error for a non-success HTTP status
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Api { status, message },
        }
    }

    /// Message sent by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. }
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message) => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: server message verbatim, local validation
    /// message, or the caller's fallback
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(err) => err.message.clone(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
            || matches!(self, Self::Validation(e) if e.code.http_status() == StatusCode::NOT_FOUND)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Shared error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Api { status, .. } => ErrorCode::from_http_status(*status),
            Self::Unauthorized(_) => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(e) => e.code,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Io(_) => ErrorCode::NoFileProvided,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Cancelled => ErrorCode::Unknown,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
