use crate::auth::models::IssuedToken;
use crate::auth::password::{DUMMY_PASSWORD_HASH, PasswordVerifier};
use crate::auth::store::CredentialStore;
use chrono::{DateTime, Timelike, Utc};
use gatehouse_core::TokenSettings;
use gatehouse_token::{ClaimSet, SymmetricKey, TokenCodec, TokenError};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IssueError {
    /// Unknown user or wrong password. Both read the same.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("credential store failure: {0}")]
    Store(String),

    #[error("password verification failed to run: {0}")]
    Verifier(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Mints session tokens after a credential check.
///
/// Security constraint: [`Issuer::mint`] skips the credential check and is
/// only for callers that have already authenticated the principal.
pub struct Issuer {
    store: Arc<dyn CredentialStore>,
    verifier: Arc<dyn PasswordVerifier>,
    codec: TokenCodec,
    settings: TokenSettings,
}

impl Issuer {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        verifier: Arc<dyn PasswordVerifier>,
        codec: TokenCodec,
        settings: TokenSettings,
    ) -> Self {
        Self {
            store,
            verifier,
            codec,
            settings,
        }
    }

    /// The key every token from this issuer is encrypted under.
    pub fn key(&self) -> &SymmetricKey {
        self.codec.key()
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Check `username`/`password` and mint a token for the stored identity.
    pub async fn issue(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        let record = self
            .store
            .lookup(username)
            .await
            .map_err(|e| IssueError::Store(e.to_string()))?;

        // Unknown users still pay for a hash check so response time does
        // not reveal whether the account exists.
        let hash = record
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |r| r.password_hash.as_str())
            .to_owned();
        let verified = self.verify_password(password, hash).await?;

        let Some(record) = record else {
            tracing::info!(username, "login rejected: unknown user");
            return Err(IssueError::InvalidCredentials);
        };
        if !verified {
            tracing::info!(username, "login rejected: password mismatch");
            return Err(IssueError::InvalidCredentials);
        }

        self.mint(&record.identity, now)
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, IssueError> {
        let verifier = Arc::clone(&self.verifier);
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || verifier.verify(&password, &hash))
            .await
            .map_err(|e| IssueError::Verifier(e.to_string()))
    }

    /// Mint a token for an already-authenticated identity.
    pub fn mint(&self, identity: &str, now: DateTime<Utc>) -> Result<IssuedToken, IssueError> {
        let now = now.with_nanosecond(0).unwrap_or(now);
        let unique_id = Uuid::new_v4().to_string();

        let claims = ClaimSet::builder()
            .subject(&self.settings.subject)
            .audience(&self.settings.audience)
            .issuer(&self.settings.issuer)
            .unique_id(&unique_id)
            .identity(identity)
            .valid_for(now, self.settings.ttl)
            .build()?;

        let token = self.codec.encode(&claims)?;

        tracing::info!(
            admin_id = identity,
            jti = %unique_id,
            expires_at = %claims.expiration().to_rfc3339(),
            "issued session token"
        );

        Ok(IssuedToken {
            token,
            unique_id,
            expires_at: claims.expiration(),
        })
    }
}
