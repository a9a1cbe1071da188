//! Symmetric key material for `v4.local` tokens.

use crate::error::TokenError;
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rusty_paseto::core::{Key, Local, PasetoSymmetricKey, V4};
use std::fmt;
use std::path::Path;

/// Key length required by PASETO `v4.local`.
pub const KEY_LEN: usize = 32;

/// The single symmetric key used to encrypt and decrypt tokens.
///
/// Load it once at startup and share it behind an `Arc`; it is never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey {
    bytes: [u8; KEY_LEN],
}

impl SymmetricKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut bytes = [0u8; KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Create a key from exactly 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            TokenError::InvalidKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Load a key from a hex-encoded string.
    pub fn from_hex(hex: &str) -> Result<Self, TokenError> {
        let bytes = hex::decode(hex.trim()).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse key material in any supported encoding.
    ///
    /// Accepted, in order: 64 hex characters, base64url or standard base64
    /// of 32 bytes, or a raw 32-byte string.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let trimmed = raw.trim();

        if trimmed.len() == KEY_LEN * 2 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(trimmed);
        }

        for engine in [&general_purpose::URL_SAFE_NO_PAD, &general_purpose::STANDARD] {
            if let Ok(bytes) = engine.decode(trimmed) {
                if bytes.len() == KEY_LEN {
                    return Self::from_bytes(&bytes);
                }
            }
        }

        if trimmed.len() == KEY_LEN {
            return Self::from_bytes(trimmed.as_bytes());
        }

        Err(TokenError::InvalidKey(
            "expected 64 hex characters, base64 of 32 bytes, or a 32-byte string".to_string(),
        ))
    }

    /// Get the key as hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Save the key (hex) to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), TokenError> {
        std::fs::write(path, self.to_hex())?;
        Ok(())
    }

    /// Load a key from a file in any encoding accepted by [`SymmetricKey::parse`].
    pub fn load_from_file(path: &Path) -> Result<Self, TokenError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub(crate) fn paseto_key(&self) -> PasetoSymmetricKey<V4, Local> {
        PasetoSymmetricKey::<V4, Local>::from(Key::from(self.bytes))
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}
