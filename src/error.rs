//! Error types for the OAuth2 client runtime.

use thiserror::Error;

use crate::types::ErrorResponse;

/// Primary error type for all token operations.
#[derive(Error, Debug)]
pub enum OAuth2Error {
    /// Network failure before a response could be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response without a parsable OAuth2 error body.
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// A parsed OAuth2 error response (RFC 6749 §5.2).
    #[error("OAuth2 error: {0}")]
    Protocol(ErrorResponse),

    /// Domain authentication state: device code expired, no refresh token
    /// available, refresh rejected. Callers should re-authenticate.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A 2xx response whose body is not a token or error response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl OAuth2Error {
    /// The OAuth2 error code, if this is a protocol error.
    pub fn oauth2_code(&self) -> Option<&str> {
        match self {
            Self::Protocol(response) => Some(&response.error),
            _ => None,
        }
    }

    /// Whether this error means the caller must authenticate from scratch,
    /// as opposed to a transient server or transport failure.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, OAuth2Error>;
