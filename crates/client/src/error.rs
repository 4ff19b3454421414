//! Error types for the Lightrail client

use lightrail_crypto::CryptoError;
use thiserror::Error;

/// Result type alias for client operations
pub type LightrailResult<T> = Result<T, LightrailError>;

/// Lightrail client errors
///
/// A webhook signature that does not match is reported as `Ok(false)`, never
/// as an error, so callers can tell a malformed request from a forged one.
#[derive(Error, Debug)]
pub enum LightrailError {
    /// A required argument was missing or empty
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Required configuration is not set
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured API key is not a decodable signed token
    #[error("API key is not a valid signed token: {0}")]
    InvalidApiKey(#[source] jsonwebtoken::errors::Error),

    /// Token encoding, decoding or signature check failed
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl LightrailError {
    /// Create an argument error
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this is a caller-contract violation
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    /// Check if this is caused by missing or unusable configuration
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidApiKey(_))
    }
}

impl From<CryptoError> for LightrailError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::MissingArgument(name) => {
                Self::Argument(format!("{name} must not be empty"))
            }
        }
    }
}
