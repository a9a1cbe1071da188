//! Validation error types for claim rules.
//!
//! Every failure names the rule that rejected the token. Temporal failures
//! get their own kinds so callers can tell an authentic-but-stale token from
//! a token minted for somebody else.

use chrono::{DateTime, Utc};
use std::fmt;

/// Error type for claim rule failures.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Name of the rule that failed.
    pub rule: &'static str,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(kind: ValidationErrorKind, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            rule,
            message: message.into(),
        }
    }

    // =========================================================================
    // CLAIM MATCH ERRORS
    // =========================================================================

    /// Create an audience mismatch error.
    pub fn audience_mismatch(rule: &'static str, expected: &str, actual: &str) -> Self {
        Self::new(
            ValidationErrorKind::AudienceMismatch,
            rule,
            format!("audience '{}' does not match expected '{}'", actual, expected),
        )
    }

    /// Create a subject mismatch error.
    pub fn subject_mismatch(rule: &'static str, expected: &str, actual: &str) -> Self {
        Self::new(
            ValidationErrorKind::SubjectMismatch,
            rule,
            format!("subject '{}' does not match expected '{}'", actual, expected),
        )
    }

    /// Create an issuer mismatch error.
    pub fn issuer_mismatch(rule: &'static str, expected: &str, actual: &str) -> Self {
        Self::new(
            ValidationErrorKind::IssuerMismatch,
            rule,
            format!("issuer '{}' does not match expected '{}'", actual, expected),
        )
    }

    /// Create a missing token identifier error.
    pub fn missing_identifier(rule: &'static str) -> Self {
        Self::new(
            ValidationErrorKind::MissingIdentifier,
            rule,
            "token identifier (jti) is missing",
        )
    }

    // =========================================================================
    // TEMPORAL ERRORS
    // =========================================================================

    /// Create an expired token error.
    pub fn expired(rule: &'static str, expiration: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::new(
            ValidationErrorKind::Expired,
            rule,
            format!(
                "token expired at {} (now {})",
                expiration.to_rfc3339(),
                now.to_rfc3339()
            ),
        )
    }

    /// Create a not-yet-valid token error.
    pub fn not_yet_valid(
        rule: &'static str,
        not_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            ValidationErrorKind::NotYetValid,
            rule,
            format!(
                "token not valid before {} (now {})",
                not_before.to_rfc3339(),
                now.to_rfc3339()
            ),
        )
    }

    /// Whether the token was authentic but outside its validity window.
    pub fn is_temporal(&self) -> bool {
        self.kind.is_temporal()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule '{}' failed: {}", self.rule, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    // =========================================================================
    // Claim rule errors
    // =========================================================================
    /// Audience claim does not match.
    AudienceMismatch,
    /// Subject claim does not match.
    SubjectMismatch,
    /// Issuer claim does not match.
    IssuerMismatch,
    /// Token identifier is empty.
    MissingIdentifier,

    // =========================================================================
    // Temporal errors
    // =========================================================================
    /// Current time is past the expiration claim.
    Expired,
    /// Current time is before the not-before claim.
    NotYetValid,
}

impl ValidationErrorKind {
    pub fn is_temporal(self) -> bool {
        matches!(self, ValidationErrorKind::Expired | ValidationErrorKind::NotYetValid)
    }

    /// Stable snake_case code for logs.
    pub fn code(self) -> &'static str {
        match self {
            ValidationErrorKind::AudienceMismatch => "audience_mismatch",
            ValidationErrorKind::SubjectMismatch => "subject_mismatch",
            ValidationErrorKind::IssuerMismatch => "issuer_mismatch",
            ValidationErrorKind::MissingIdentifier => "missing_identifier",
            ValidationErrorKind::Expired => "token_expired",
            ValidationErrorKind::NotYetValid => "token_not_yet_valid",
        }
    }
}
