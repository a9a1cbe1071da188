//! Claim rules.
//!
//! Each rule is a named predicate over a decoded [`ClaimSet`]:
//! - Audience, subject and issuer equality
//! - Token identifier presence
//! - Not-before / expiration window against the current time

use crate::error::ValidationError;
use chrono::{DateTime, Duration, Utc};
use gatehouse_token::ClaimSet;

/// A named predicate checked against decoded claims.
pub trait ClaimRule: Send + Sync {
    /// Rule name reported when the rule fails.
    fn name(&self) -> &'static str;

    /// Check the claims at time `now`.
    fn check(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), ValidationError>;
}

/// Requires `aud` to equal the expected audience.
#[derive(Debug, Clone)]
pub struct ForAudience(pub String);

impl ClaimRule for ForAudience {
    fn name(&self) -> &'static str {
        "audience"
    }

    fn check(&self, claims: &ClaimSet, _now: DateTime<Utc>) -> Result<(), ValidationError> {
        if claims.audience() != self.0 {
            return Err(ValidationError::audience_mismatch(
                self.name(),
                &self.0,
                claims.audience(),
            ));
        }
        Ok(())
    }
}

/// Requires `sub` to equal the expected subject.
#[derive(Debug, Clone)]
pub struct ForSubject(pub String);

impl ClaimRule for ForSubject {
    fn name(&self) -> &'static str {
        "subject"
    }

    fn check(&self, claims: &ClaimSet, _now: DateTime<Utc>) -> Result<(), ValidationError> {
        if claims.subject() != self.0 {
            return Err(ValidationError::subject_mismatch(
                self.name(),
                &self.0,
                claims.subject(),
            ));
        }
        Ok(())
    }
}

/// Requires `iss` to equal the expected issuer.
#[derive(Debug, Clone)]
pub struct IssuedBy(pub String);

impl ClaimRule for IssuedBy {
    fn name(&self) -> &'static str {
        "issuer"
    }

    fn check(&self, claims: &ClaimSet, _now: DateTime<Utc>) -> Result<(), ValidationError> {
        if claims.issuer() != self.0 {
            return Err(ValidationError::issuer_mismatch(
                self.name(),
                &self.0,
                claims.issuer(),
            ));
        }
        Ok(())
    }
}

/// Requires a non-empty `jti`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasIdentifier;

impl ClaimRule for HasIdentifier {
    fn name(&self) -> &'static str {
        "unique_id"
    }

    fn check(&self, claims: &ClaimSet, _now: DateTime<Utc>) -> Result<(), ValidationError> {
        if claims.unique_id().trim().is_empty() {
            return Err(ValidationError::missing_identifier(self.name()));
        }
        Ok(())
    }
}

/// Requires `nbf - leeway <= now <= exp + leeway`.
#[derive(Debug, Clone, Copy)]
pub struct ValidAt {
    leeway: Duration,
}

impl ValidAt {
    pub fn new(leeway: Duration) -> Self {
        Self {
            leeway: leeway.abs(),
        }
    }
}

impl Default for ValidAt {
    fn default() -> Self {
        Self::new(Duration::zero())
    }
}

impl ClaimRule for ValidAt {
    fn name(&self) -> &'static str {
        "validity_window"
    }

    fn check(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), ValidationError> {
        // Bounds saturate at the calendar limits.
        let earliest = claims
            .not_before()
            .checked_sub_signed(self.leeway)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let latest = claims
            .expiration()
            .checked_add_signed(self.leeway)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        if now < earliest {
            return Err(ValidationError::not_yet_valid(
                self.name(),
                claims.not_before(),
                now,
            ));
        }
        if now > latest {
            return Err(ValidationError::expired(self.name(), claims.expiration(), now));
        }
        Ok(())
    }
}
