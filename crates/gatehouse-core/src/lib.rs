//! # gatehouse-core
//!
//! Configuration types and claim literals shared by every Gatehouse crate.
//!
//! The issuer and the bearer middleware both read their expected claim values
//! from [`TokenSettings`], so the audience/subject a token is minted with and
//! the audience/subject it is checked against always come from one place.

// Configuration types shared across all Gatehouse crates
pub mod config;

pub use config::{ConfigError, MAX_LEEWAY, MAX_TOKEN_TTL, TokenConfig, TokenSettings, parse_ttl};

/// Audience claim carried by admin session tokens.
pub const DEFAULT_AUDIENCE: &str = "admin";

/// Subject claim identifying the admin auth domain.
pub const DEFAULT_SUBJECT: &str = "admin-auth";

/// Issuer claim used when none is configured.
pub const DEFAULT_ISSUER: &str = "gatehouse";

/// Token lifetime, in minutes, used when none is configured.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 120;

/// Environment variable holding the symmetric token key.
pub const DEFAULT_KEY_ENV: &str = "GATEHOUSE_TOKEN_KEY";
