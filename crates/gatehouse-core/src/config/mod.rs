//! Configuration types.

pub mod token;

pub use token::{MAX_LEEWAY, MAX_TOKEN_TTL, TokenConfig, TokenSettings, parse_ttl};

use thiserror::Error;

/// Errors raised while turning configuration into runtime settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration string could not be parsed.
    #[error("invalid duration for '{field}': {value}")]
    InvalidDuration { field: &'static str, value: String },

    /// A duration exceeds the largest value the token window supports.
    #[error("'{field}' of {value} exceeds the maximum of {max}")]
    DurationTooLarge {
        field: &'static str,
        value: String,
        max: String,
    },

    /// A claim literal was configured as an empty string.
    #[error("claim '{field}' must not be empty")]
    EmptyClaim { field: &'static str },
}
