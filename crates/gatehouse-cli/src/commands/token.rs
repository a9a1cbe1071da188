//! Token management commands.
//!
//! `gatehouse token mint` - Mint a session token directly from the key.
//! `gatehouse token verify` - Decode a token and run the standard claim rules.

use anyhow::Context;
use chrono::{DateTime, Timelike, Utc};
use gatehouse_core::{DEFAULT_KEY_ENV, TokenSettings, parse_ttl};
use gatehouse_policy::ClaimValidator;
use gatehouse_token::{ClaimSet, SymmetricKey, TokenCodec};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Resolve the key from either a file path or an encoded string.
///
/// The key string can be:
/// - A path to a file containing the key
/// - The key itself in hex, base64, or raw form (e.g., from GATEHOUSE_TOKEN_KEY)
fn resolve_key(key: Option<String>) -> anyhow::Result<SymmetricKey> {
    let key_str = key.with_context(|| {
        format!("Token key not provided. Either pass --key <path|hex> or set {DEFAULT_KEY_ENV}")
    })?;

    let path = Path::new(&key_str);
    if path.exists() {
        return SymmetricKey::load_from_file(path)
            .with_context(|| format!("Failed to load token key from file: {}", path.display()));
    }

    SymmetricKey::parse(&key_str).context("Failed to parse token key")
}

fn settings(issuer: Option<String>, ttl: Option<&str>) -> anyhow::Result<TokenSettings> {
    let mut settings = TokenSettings::default();
    if let Some(issuer) = issuer {
        settings.issuer = issuer;
    }
    if let Some(ttl) = ttl {
        settings.ttl = parse_ttl(ttl).context("Invalid --ttl")?;
    }
    Ok(settings)
}

/// Build and encode a claim set for `identity`.
pub fn mint_token(
    key: SymmetricKey,
    identity: &str,
    settings: &TokenSettings,
    now: DateTime<Utc>,
) -> anyhow::Result<String> {
    let now = now.with_nanosecond(0).unwrap_or(now);
    let claims = ClaimSet::builder()
        .subject(&settings.subject)
        .audience(&settings.audience)
        .issuer(&settings.issuer)
        .unique_id(Uuid::new_v4().to_string())
        .identity(identity)
        .valid_for(now, settings.ttl)
        .build()?;

    Ok(TokenCodec::new(Arc::new(key)).encode(&claims)?)
}

/// Decode `token` and run the standard claim rules at `now`.
pub fn verify_token(
    key: SymmetricKey,
    token: &str,
    settings: &TokenSettings,
    now: DateTime<Utc>,
) -> anyhow::Result<ClaimSet> {
    let claims = TokenCodec::new(Arc::new(key)).decode(token.trim())?;
    ClaimValidator::standard(settings).validate(&claims, now)?;
    Ok(claims)
}

/// Mint a new session token.
pub fn mint(
    key: Option<String>,
    identity: String,
    issuer: Option<String>,
    ttl: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let key = resolve_key(key)?;
    let settings = settings(issuer, ttl.as_deref())?;
    let now = Utc::now();
    let token = mint_token(key, &identity, &settings, now)?;

    if let Some(output_path) = output {
        fs::write(&output_path, &token)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Admin ID: {}", identity);
        println!("  Issuer: {}", settings.issuer);
        println!("  Expires: {}", (now + settings.ttl).to_rfc3339());
    } else {
        println!("{}", token);
    }

    Ok(())
}

/// Verify a token is valid right now.
pub fn verify(key: Option<String>, issuer: Option<String>, token: String) -> anyhow::Result<()> {
    let key = resolve_key(key)?;
    let settings = settings(issuer, None)?;

    // Load token from file if it looks like a path
    let token_str = if Path::new(&token).exists() {
        fs::read_to_string(&token)?.trim().to_string()
    } else {
        token
    };

    let now = Utc::now();
    let claims = verify_token(key, &token_str, &settings, now)
        .context("✖ Token verification failed")?;

    println!("✔ Token is valid");
    println!();
    println!("Token Details:");
    println!("  Admin ID: {}", claims.identity());
    println!("  Token ID: {}", claims.unique_id());
    println!("  Issuer: {}", claims.issuer());
    println!("  Expires: {}", claims.expiration().to_rfc3339());
    println!(
        "  Remaining: {}",
        humantime::format_duration(claims.remaining_ttl(now).to_std().unwrap_or_default())
    );
    println!();
    println!("{}", serde_json::to_string_pretty(&claims)?);

    Ok(())
}
