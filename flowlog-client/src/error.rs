//! Error types for the Flowlog client

use flowlog_core::domain::log::InvalidLogLevel;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Flowlog client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally, before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend answered with a non-success status code
    #[error("HTTP error (status {status}): {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body as sent by the backend
        body: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Base URL cannot be used to build endpoint URLs
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Create an HTTP error from status code and body
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Status code of an HTTP error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error was raised before reaching the backend
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if (400..500).contains(status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status >= 500)
    }
}

impl From<InvalidLogLevel> for ClientError {
    fn from(err: InvalidLogLevel) -> Self {
        Self::Validation(err.to_string())
    }
}
