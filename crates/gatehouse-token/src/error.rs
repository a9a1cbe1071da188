//! Error types for the token crate.

use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A required claim is absent or empty.
    #[error("token missing required claim: {claim}")]
    MissingClaim { claim: &'static str },

    /// The claim set violates an ordering invariant.
    #[error("invalid claim set: {0}")]
    InvalidClaims(String),

    /// Serialization or encryption failed while encoding.
    #[error("failed to encode token: {0}")]
    Encoding(String),

    /// The token is malformed, failed authentication, or carries no valid claims.
    #[error("token authentication failed: {0}")]
    Authentication(String),

    /// Failed to parse key material.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TokenError {
    /// Whether this error was raised while encoding a claim set.
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            TokenError::MissingClaim { .. } | TokenError::InvalidClaims(_) | TokenError::Encoding(_)
        )
    }

    /// Whether this error was raised while authenticating a token.
    pub fn is_authentication(&self) -> bool {
        matches!(self, TokenError::Authentication(_))
    }
}
