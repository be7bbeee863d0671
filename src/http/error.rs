//! Error taxonomy for everything that crosses the network boundary.

use thiserror::Error;

/// Errors produced by the HTTP layer.
///
/// `Auth` is special: by the time a caller sees it, the [`SessionGuard`](super::SessionGuard)
/// has already been expired and the login signal emitted. Callers only need to
/// render it, never to act on it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered 401.
    #[error("Session expired")]
    Auth,

    /// The backend answered with a non-2xx status other than 401.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The payload did not have the expected shape.
    #[error("Unexpected response payload: {0}")]
    Parse(String),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Status code of a server-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The message the backend sent along with a failure, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Parse(error.to_string())
        } else if error.is_builder() {
            ApiError::Configuration(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Parse(error.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(error: url::ParseError) -> Self {
        ApiError::Configuration(error.to_string())
    }
}
