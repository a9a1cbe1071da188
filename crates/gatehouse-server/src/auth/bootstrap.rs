use crate::auth::models::CredentialRecord;
use crate::auth::password::hash_password;
use crate::auth::store::InMemoryCredentialStore;
use crate::config::AppConfig;

/// On startup, if the store is empty, create the configured admin user.
///
/// Password source (highest precedence first):
/// - env `GATEHOUSE_BOOTSTRAP_PASSWORD`
/// - `gatehouse.toml` `[bootstrap].password`
pub async fn bootstrap_admin(
    store: &InMemoryCredentialStore,
    cfg: &AppConfig,
) -> anyhow::Result<()> {
    if !store.is_empty().await {
        return Ok(());
    }

    let password = std::env::var("GATEHOUSE_BOOTSTRAP_PASSWORD")
        .unwrap_or_else(|_| cfg.bootstrap.password.clone());

    seed_admin(store, &cfg.bootstrap.username, &cfg.bootstrap.admin_id, &password).await?;

    tracing::warn!(
        username = %cfg.bootstrap.username,
        admin_id = %cfg.bootstrap.admin_id,
        "bootstrapped admin user (password taken from env/config)"
    );
    Ok(())
}

/// Hash `password` and store it for `username`.
pub async fn seed_admin(
    store: &InMemoryCredentialStore,
    username: &str,
    admin_id: &str,
    password: &str,
) -> anyhow::Result<()> {
    if username.trim().is_empty() || admin_id.trim().is_empty() {
        anyhow::bail!(
            "bootstrap admin username and admin_id must be set ([bootstrap] in gatehouse.toml)"
        );
    }
    if password.trim().is_empty() {
        anyhow::bail!(
            "bootstrap admin password is empty \
             (set GATEHOUSE_BOOTSTRAP_PASSWORD or gatehouse.toml [bootstrap].password)"
        );
    }

    let password = password.to_owned();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    store
        .insert(CredentialRecord {
            username: username.to_string(),
            identity: admin_id.to_string(),
            password_hash,
        })
        .await;
    Ok(())
}
