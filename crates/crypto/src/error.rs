//! Error types for the crypto crate.

use thiserror::Error;

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during crypto operations.
///
/// A signature that simply does not match is not an error; see
/// [`verify_webhook_signature`](crate::verify_webhook_signature).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// A required input was empty
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
}

impl CryptoError {
    /// Name of the offending argument
    #[must_use]
    pub fn argument(&self) -> &'static str {
        match self {
            Self::MissingArgument(name) => name,
        }
    }
}
