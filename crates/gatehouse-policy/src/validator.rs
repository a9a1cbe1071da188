//! Validator that runs an ordered list of claim rules.
//!
//! The `ClaimValidator` is the entry point for checking a decoded token. The
//! standard rule set, in evaluation order:
//!
//! 1. **Audience** - `aud` equals the configured audience
//! 2. **Identifier** - `jti` is present
//! 3. **Subject** - `sub` equals the configured subject
//! 4. **Issuer** - `iss` equals the configured issuer
//! 5. **Validity window** - `nbf <= now <= exp`, widened by the leeway

use crate::error::ValidationError;
use crate::rules::{ClaimRule, ForAudience, ForSubject, HasIdentifier, IssuedBy, ValidAt};
use chrono::{DateTime, Utc};
use gatehouse_core::TokenSettings;
use gatehouse_token::ClaimSet;

/// Validates decoded claims against an ordered rule list.
///
/// A token is accepted only if every rule passes. Evaluation stops at the
/// first failing rule, whose name is carried by the returned error.
#[derive(Default)]
pub struct ClaimValidator {
    rules: Vec<Box<dyn ClaimRule>>,
}

impl ClaimValidator {
    /// Create a validator with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Rules run in insertion order.
    pub fn with_rule(mut self, rule: impl ClaimRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Build the standard rule set from the settings the issuer mints with.
    pub fn standard(settings: &TokenSettings) -> Self {
        Self::new()
            .with_rule(ForAudience(settings.audience.clone()))
            .with_rule(HasIdentifier)
            .with_rule(ForSubject(settings.subject.clone()))
            .with_rule(IssuedBy(settings.issuer.clone()))
            .with_rule(ValidAt::new(settings.leeway))
    }

    /// Validate claims at time `now`.
    pub fn validate(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), ValidationError> {
        for rule in &self.rules {
            if let Err(err) = rule.check(claims, now) {
                tracing::debug!(rule = rule.name(), kind = err.kind.code(), "claim rule failed");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl std::fmt::Debug for ClaimValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimValidator")
            .field("rules", &self.rule_names())
            .finish()
    }
}
