//! Error types for the Atrium console.

use thiserror::Error;

/// Result type alias using Atrium's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for console operations.
///
/// The taxonomy mirrors how the gateway reports failures: transport-level
/// problems, HTTP status classes, and client-side validation. Nothing here
/// is retried automatically — every variant surfaces exactly once at the
/// call site that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Network/transport failure (no response received)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the fixed overall timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Authentication failure (401) — session must be cleared
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure (403) — authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit hit (429) — reported inline, never backed off
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Server-side error (5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// Client-side form/schema rejection, raised before any request is sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Streaming response decode failure
    #[error("Stream error: {0}")]
    Stream(String),

    /// Local state store I/O failure
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Normalize an HTTP status code into the console's error taxonomy.
    ///
    /// The message is whatever the gateway put in the response body (or a
    /// canned fallback); the variant is what the UI layer dispatches on.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            429 => Error::RateLimited(message),
            500..=599 => Error::Server(message),
            _ => Error::Network(format!("unexpected status {}: {}", status, message)),
        }
    }

    /// True when this error must tear down the session (spec: any 401
    /// clears credentials and navigates to login, wherever it came from).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else if e.is_connect() {
            Error::Network(format!("connect: {}", e))
        } else {
            Error::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Store(e.to_string())
    }
}
