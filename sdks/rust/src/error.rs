//! Error types for the SDK.

use thiserror::Error;

/// SDK error type.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    #[cfg(feature = "http-client")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-2xx response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the body, or the raw body when it has none.
        message: String,
    },

    /// Reading or writing a persisted token failed.
    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),

    /// Configuration error (embedded mode).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Runtime error (embedded mode).
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl Error {
    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;
