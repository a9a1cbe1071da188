//! Token issuance and validation configuration.

use super::ConfigError;
use crate::{
    DEFAULT_AUDIENCE, DEFAULT_ISSUER, DEFAULT_KEY_ENV, DEFAULT_SUBJECT, DEFAULT_TOKEN_TTL_MINUTES,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest token lifetime accepted from configuration.
pub const MAX_TOKEN_TTL: Duration = Duration::days(366);

/// Largest clock-skew leeway accepted from configuration.
pub const MAX_LEEWAY: Duration = Duration::hours(1);

/// Configuration for token key material and claim values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Environment variable containing the symmetric key.
    #[serde(default = "default_key_env")]
    pub key_env: String,

    /// Path to a file containing the symmetric key.
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Issuer claim written into every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Audience claim written into and required of every token.
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Subject claim written into and required of every token.
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Token lifetime (e.g., "120m", "2h").
    #[serde(default = "default_ttl")]
    pub ttl: String,

    /// Clock skew tolerated on the not-before and expiration checks.
    #[serde(default = "default_leeway")]
    pub leeway: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            key_env: default_key_env(),
            key_file: None,
            issuer: default_issuer(),
            audience: default_audience(),
            subject: default_subject(),
            ttl: default_ttl(),
            leeway: default_leeway(),
        }
    }
}

impl TokenConfig {
    /// Resolve the raw key string from environment or file.
    ///
    /// The environment variable wins over the file. Returns `Ok(None)` when
    /// neither source is set; callers decide whether that is fatal.
    pub fn resolve_key(&self) -> Result<Option<String>, std::io::Error> {
        if let Ok(key) = std::env::var(&self.key_env) {
            if !key.trim().is_empty() {
                return Ok(Some(key));
            }
        }

        if let Some(path) = &self.key_file {
            if path.exists() {
                let key = std::fs::read_to_string(path)?;
                return Ok(Some(key.trim().to_string()));
            }
        }

        Ok(None)
    }

    /// Validate the configuration and produce runtime settings.
    pub fn settings(&self) -> Result<TokenSettings, ConfigError> {
        for (field, value) in [
            ("issuer", &self.issuer),
            ("audience", &self.audience),
            ("subject", &self.subject),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyClaim { field });
            }
        }

        Ok(TokenSettings {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            subject: self.subject.clone(),
            ttl: parse_ttl(&self.ttl)?,
            leeway: parse_bounded("leeway", &self.leeway, MAX_LEEWAY)?,
        })
    }
}

/// Validated claim values and lifetimes used by both issuance and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub subject: String,
    pub ttl: Duration,
    pub leeway: Duration,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            leeway: Duration::zero(),
        }
    }
}

/// Parse a token lifetime such as "120m", capped at [`MAX_TOKEN_TTL`].
pub fn parse_ttl(value: &str) -> Result<Duration, ConfigError> {
    parse_bounded("ttl", value, MAX_TOKEN_TTL)
}

fn parse_bounded(
    field: &'static str,
    value: &str,
    max: Duration,
) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
    };
    let std_duration = humantime::parse_duration(value.trim()).map_err(|_| invalid())?;
    let duration = Duration::from_std(std_duration).map_err(|_| invalid())?;

    if duration > max {
        return Err(ConfigError::DurationTooLarge {
            field,
            value: value.trim().to_string(),
            max: max
                .to_std()
                .map(|d| humantime::format_duration(d).to_string())
                .unwrap_or_default(),
        });
    }
    Ok(duration)
}

fn default_key_env() -> String {
    DEFAULT_KEY_ENV.to_string()
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_ttl() -> String {
    format!("{DEFAULT_TOKEN_TTL_MINUTES}m")
}

fn default_leeway() -> String {
    "0s".to_string()
}
