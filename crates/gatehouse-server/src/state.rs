use crate::auth::{
    Argon2Verifier, CredentialStore, InMemoryCredentialStore, Issuer, PasswordVerifier,
    bootstrap::bootstrap_admin,
};
use crate::config::AppConfig;
use anyhow::Context;
use gatehouse_policy::ClaimValidator;
use gatehouse_token::{SymmetricKey, TokenCodec};
use std::sync::Arc;

/// Shared application state.
///
/// Everything here is read-only after startup; the key lives behind the
/// codec's `Arc` and is shared by the issuer and the bearer middleware.
pub struct AppState {
    pub cfg: AppConfig,
    pub issuer: Issuer,
    pub codec: TokenCodec,
    pub validator: ClaimValidator,
}

impl AppState {
    /// Resolve the key, seed the admin user and wire everything together.
    ///
    /// A missing or malformed key is fatal.
    pub async fn init(cfg: &AppConfig) -> anyhow::Result<Self> {
        let raw = cfg
            .token
            .resolve_key()
            .context("failed to read token key file")?
            .with_context(|| {
                format!(
                    "no token key configured: set {} or [token].key_file",
                    cfg.token.key_env
                )
            })?;
        let key = SymmetricKey::parse(&raw).context("failed to parse token key")?;

        let store = InMemoryCredentialStore::new();
        bootstrap_admin(&store, cfg).await?;

        Self::new(cfg.clone(), key, Arc::new(store), Arc::new(Argon2Verifier))
    }

    pub fn new(
        cfg: AppConfig,
        key: SymmetricKey,
        store: Arc<dyn CredentialStore>,
        verifier: Arc<dyn PasswordVerifier>,
    ) -> anyhow::Result<Self> {
        let settings = cfg.token.settings().context("invalid [token] configuration")?;
        let codec = TokenCodec::new(Arc::new(key));
        let validator = ClaimValidator::standard(&settings);
        let issuer = Issuer::new(store, verifier, codec.clone(), settings);

        tracing::info!(
            issuer = %issuer.settings().issuer,
            audience = %issuer.settings().audience,
            rules = ?validator.rule_names(),
            "token subsystem ready"
        );

        Ok(Self {
            cfg,
            issuer,
            codec,
            validator,
        })
    }
}
