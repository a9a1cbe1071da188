use gatehouse_core::TokenConfig;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub token: TokenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Append the internal rejection cause to 401 bodies. Keep off in production.
    #[serde(default)]
    pub expose_error_details: bool,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            expose_error_details: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Login name of the seeded admin.
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Durable admin id written into the `admin_id` claim.
    #[serde(default = "default_admin_id")]
    pub admin_id: String,

    /// Seed password. For security: prefer setting env var
    /// `GATEHOUSE_BOOTSTRAP_PASSWORD`.
    #[serde(default = "default_admin_password")]
    pub password: String,
}

fn default_admin_username() -> String {
    "admin@example.com".to_string()
}

fn default_admin_id() -> String {
    "1".to_string()
}

fn default_admin_password() -> String {
    "changeme".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            admin_id: default_admin_id(),
            password: default_admin_password(),
        }
    }
}

/// Load the server config. A missing file yields defaults.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = config_path();
    if !path.exists() {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(&path)?;
    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> anyhow::Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(raw)?;
    Ok(cfg)
}

fn config_path() -> PathBuf {
    if let Ok(p) = env::var("GATEHOUSE_SERVER_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("gatehouse.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:8080");
        assert!(!cfg.server.expose_error_details);
        assert_eq!(cfg.bootstrap.username, "admin@example.com");
        assert_eq!(cfg.bootstrap.admin_id, "1");
        assert_eq!(cfg.token.audience, "admin");
    }

    #[test]
    fn test_sections_override_defaults() {
        let cfg = parse_config(
            r#"
            [server]
            bind = "127.0.0.1:9000"
            expose_error_details = true

            [bootstrap]
            username = "root@example.com"
            admin_id = "42"

            [token]
            issuer = "billing-api"
            ttl = "15m"
            key_file = "/etc/gatehouse/token.key"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
        assert!(cfg.server.expose_error_details);
        assert_eq!(cfg.bootstrap.username, "root@example.com");
        assert_eq!(cfg.bootstrap.admin_id, "42");
        assert_eq!(cfg.bootstrap.password, "changeme");

        let settings = cfg.token.settings().unwrap();
        assert_eq!(settings.issuer, "billing-api");
        assert_eq!(settings.ttl, chrono::Duration::minutes(15));
        assert_eq!(
            cfg.token.key_file.as_deref(),
            Some(std::path::Path::new("/etc/gatehouse/token.key"))
        );
    }

    #[test]
    fn test_malformed_config_rejected() {
        assert!(parse_config("[server\nbind = 1").is_err());
    }
}
