//! Session token claims.

use crate::error::TokenError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried inside an admin session token.
///
/// Fields are private: a claim set is assembled once through
/// [`ClaimSetBuilder`] and read afterwards. Serialized field order follows
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Auth domain (e.g., "admin-auth").
    #[serde(rename = "sub")]
    subject: String,

    /// Intended consumer (e.g., "admin").
    #[serde(rename = "aud")]
    audience: String,

    /// Issuing service.
    #[serde(rename = "iss")]
    issuer: String,

    /// Per-token identifier.
    #[serde(rename = "jti")]
    unique_id: String,

    #[serde(rename = "iat")]
    issued_at: DateTime<Utc>,

    #[serde(rename = "nbf")]
    not_before: DateTime<Utc>,

    #[serde(rename = "exp")]
    expiration: DateTime<Utc>,

    /// Durable identifier of the authenticated principal.
    #[serde(rename = "admin_id")]
    identity: String,
}

impl ClaimSet {
    /// Start building a claim set.
    pub fn builder() -> ClaimSetBuilder {
        ClaimSetBuilder::default()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Time left until expiration, clamped at zero.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Duration {
        (self.expiration - now).max(Duration::zero())
    }

    /// Check that every required claim is present and timestamps are ordered.
    pub fn check_complete(&self) -> Result<(), TokenError> {
        for (claim, value) in [
            ("sub", &self.subject),
            ("aud", &self.audience),
            ("iss", &self.issuer),
            ("jti", &self.unique_id),
            ("admin_id", &self.identity),
        ] {
            if value.trim().is_empty() {
                return Err(TokenError::MissingClaim { claim });
            }
        }

        if self.issued_at > self.not_before {
            return Err(TokenError::InvalidClaims(
                "issued-at is later than not-before".to_string(),
            ));
        }
        if self.not_before > self.expiration {
            return Err(TokenError::InvalidClaims(
                "not-before is later than expiration".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`ClaimSet`].
#[derive(Debug, Clone, Default)]
pub struct ClaimSetBuilder {
    subject: Option<String>,
    audience: Option<String>,
    issuer: Option<String>,
    unique_id: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    not_before: Option<DateTime<Utc>>,
    expiration: Option<DateTime<Utc>>,
    identity: Option<String>,
    window_overflow: bool,
}

impl ClaimSetBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = Some(at);
        self
    }

    pub fn not_before(mut self, at: DateTime<Utc>) -> Self {
        self.not_before = Some(at);
        self
    }

    pub fn expiration(mut self, at: DateTime<Utc>) -> Self {
        self.expiration = Some(at);
        self
    }

    /// Set issued-at and not-before to `now` and expiration to `now + ttl`.
    ///
    /// A `ttl` that overflows the calendar makes [`build`](Self::build) fail.
    pub fn valid_for(mut self, now: DateTime<Utc>, ttl: Duration) -> Self {
        match now.checked_add_signed(ttl) {
            Some(expiration) => self.issued_at(now).not_before(now).expiration(expiration),
            None => {
                self.window_overflow = true;
                self.issued_at(now).not_before(now)
            }
        }
    }

    /// Build the claim set, rejecting missing or inconsistent claims.
    pub fn build(self) -> Result<ClaimSet, TokenError> {
        if self.window_overflow {
            return Err(TokenError::InvalidClaims(
                "expiration is out of range".to_string(),
            ));
        }
        let claims = ClaimSet {
            subject: self.subject.ok_or(TokenError::MissingClaim { claim: "sub" })?,
            audience: self.audience.ok_or(TokenError::MissingClaim { claim: "aud" })?,
            issuer: self.issuer.ok_or(TokenError::MissingClaim { claim: "iss" })?,
            unique_id: self.unique_id.ok_or(TokenError::MissingClaim { claim: "jti" })?,
            issued_at: self.issued_at.ok_or(TokenError::MissingClaim { claim: "iat" })?,
            not_before: self.not_before.ok_or(TokenError::MissingClaim { claim: "nbf" })?,
            expiration: self.expiration.ok_or(TokenError::MissingClaim { claim: "exp" })?,
            identity: self
                .identity
                .ok_or(TokenError::MissingClaim { claim: "admin_id" })?,
        };
        claims.check_complete()?;
        Ok(claims)
    }
}
