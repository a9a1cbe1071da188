//! # gatehouse-policy
//!
//! Claim rule engine for Gatehouse session tokens.
//!
//! Decoding a token only proves it was minted with our key. This crate
//! decides whether an authentic token is acceptable right now: the audience,
//! subject and issuer must match the configured values, the token must carry
//! an identifier, and the current time must fall inside its validity window.
//!
//! ```ignore
//! let validator = ClaimValidator::standard(&settings);
//! validator.validate(&claims, Utc::now())?;
//! ```

pub mod error;
pub mod rules;
pub mod validator;

pub use error::{ValidationError, ValidationErrorKind};
pub use rules::{ClaimRule, ForAudience, ForSubject, HasIdentifier, IssuedBy, ValidAt};
pub use validator::ClaimValidator;
