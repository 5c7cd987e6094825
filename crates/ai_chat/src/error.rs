//! Chat errors

use thiserror::Error;

/// Errors that can occur during text generation
#[derive(Debug, Error)]
pub enum ChatError {
    /// No adapter registered under the requested provider id
    #[error("Unknown chat provider: {0}")]
    ProviderNotFound(String),

    /// Failed to connect to the vendor service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the vendor service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Model not found or not loaded
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during generation
    #[error("Generation timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Vendor-side server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
