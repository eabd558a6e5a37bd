//! Remote API error types

use thiserror::Error;

/// Failures talking to the business backend.
///
/// Payloads are kept as strings so the error can be cloned into every
/// requester sharing one in-flight fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse {entity} response: {message}")]
    Decode { entity: String, message: String },

    #[error("Fetch task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
