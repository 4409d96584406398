//! Error types for the DDNS reconciler
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP resolution errors
    #[error("IP resolver error: {0}")]
    IpResolver(String),

    /// DNS record gateway errors (network, auth, rate-limit, validation)
    #[error("DNS gateway error: {0}")]
    Gateway(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status from a remote endpoint
    #[error("HTTP request failed with status {0}")]
    HttpStatus(u16),

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// I/O errors (config file, log file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an IP resolver error
    pub fn ip_resolver(msg: impl Into<String>) -> Self {
        Self::IpResolver(msg.into())
    }

    /// Create a DNS gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

/// Helper for converting anyhow::Error from custom implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Gateway(err.to_string())
    }
}
