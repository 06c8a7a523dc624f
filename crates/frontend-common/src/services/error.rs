//! API error types

use thiserror::Error;

/// Errors from backend API calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Network(String),

    /// Non-2xx HTTP status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose envelope reports a failure
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Create error from an HTTP status and response body
    pub fn from_status(status: u16, message: String) -> Self {
        let message = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        };
        Self::Server { status, message }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(err) => Self::Parse(err.to_string()),
            other => Self::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
