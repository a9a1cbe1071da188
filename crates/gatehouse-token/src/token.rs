//! Token encoding and decoding.

use crate::claims::ClaimSet;
use crate::error::TokenError;
use crate::keys::SymmetricKey;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use rusty_paseto::core::{Footer, ImplicitAssertion, Key, Local, Paseto, PasetoNonce, Payload, V4};
use std::sync::Arc;

/// Version/purpose header every token starts with.
pub const TOKEN_HEADER: &str = "v4.local.";

/// Nonce plus authentication tag; any shorter body cannot be a token.
const MIN_BODY_LEN: usize = 32 + 32;

/// Encode a claim set into a `v4.local` token under `key`.
///
/// Incomplete claim sets are rejected before anything is encrypted.
pub fn encode(claims: &ClaimSet, key: &SymmetricKey) -> Result<String, TokenError> {
    claims.check_complete()?;

    let payload =
        serde_json::to_string(claims).map_err(|e| TokenError::Encoding(e.to_string()))?;

    let mut nonce_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut nonce_bytes);
    let nonce_key = Key::<32>::from(nonce_bytes);
    let nonce = PasetoNonce::<V4, Local>::from(&nonce_key);

    Paseto::<V4, Local>::builder()
        .set_payload(Payload::from(payload.as_str()))
        .try_encrypt(&key.paseto_key(), &nonce)
        .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Decode and authenticate a token under `key`.
///
/// Every failure maps to [`TokenError::Authentication`]; nothing from the
/// payload is returned unless the authentication tag verified.
pub fn decode(token: &str, key: &SymmetricKey) -> Result<ClaimSet, TokenError> {
    let Some(body) = token.strip_prefix(TOKEN_HEADER) else {
        return Err(TokenError::Authentication(
            "malformed token: expected v4.local header".to_string(),
        ));
    };

    let payload_part = body.split('.').next().unwrap_or_default();
    let raw = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|e| TokenError::Authentication(format!("malformed token: {e}")))?;
    if raw.len() < MIN_BODY_LEN {
        return Err(TokenError::Authentication(
            "malformed token: body too short".to_string(),
        ));
    }

    let payload = Paseto::<V4, Local>::try_decrypt(
        token,
        &key.paseto_key(),
        None::<Footer>,
        None::<ImplicitAssertion>,
    )
    .map_err(|e| TokenError::Authentication(e.to_string()))?;

    let claims: ClaimSet = serde_json::from_str(&payload).map_err(|e| {
        TokenError::Authentication(format!("payload is not a valid claim set: {e}"))
    })?;
    claims.check_complete().map_err(|e| {
        TokenError::Authentication(format!("payload is not a valid claim set: {e}"))
    })?;
    Ok(claims)
}

/// Codec bound to the process-wide key.
///
/// Cheap to clone; every clone shares the same key.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: Arc<SymmetricKey>,
}

impl TokenCodec {
    /// Create a codec around an already-initialized key.
    pub fn new(key: Arc<SymmetricKey>) -> Self {
        Self { key }
    }

    /// The key this codec encrypts and decrypts with.
    pub fn key(&self) -> &SymmetricKey {
        &self.key
    }

    pub fn encode(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        let token = encode(claims, &self.key)?;
        tracing::debug!(jti = %claims.unique_id(), "encoded session token");
        Ok(token)
    }

    pub fn decode(&self, token: &str) -> Result<ClaimSet, TokenError> {
        decode(token, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_claims() -> ClaimSet {
        ClaimSet::builder()
            .subject("admin-auth")
            .audience("admin")
            .issuer("gatehouse")
            .unique_id("1b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed")
            .identity("1")
            .valid_for(Utc::now(), Duration::minutes(120))
            .build()
            .unwrap()
    }

    #[test]
    fn test_encode_and_decode() {
        let codec = TokenCodec::new(Arc::new(SymmetricKey::generate()));
        let claims = sample_claims();

        let token = codec.encode(&claims).unwrap();
        assert!(token.starts_with(TOKEN_HEADER));

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_claims_not_in_clear() {
        let key = SymmetricKey::generate();
        let token = encode(&sample_claims(), &key).unwrap();

        assert!(!token.contains("admin-auth"));
        assert!(!token.contains("1b9d6bcd"));
    }

    #[test]
    fn test_same_claims_encrypt_differently() {
        let key = SymmetricKey::generate();
        let claims = sample_claims();

        let first = encode(&claims, &key).unwrap();
        let second = encode(&claims, &key).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_header_rejected() {
        let key = SymmetricKey::generate();
        let token = encode(&sample_claims(), &key).unwrap();
        let swapped = token.replacen("v4.local.", "v4.public.", 1);

        let err = decode(&swapped, &key).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_garbage_rejected() {
        let key = SymmetricKey::generate();
        for input in ["", "v4.local.", "v4.local.!!!", "not-a-token", "v4.local.AAAA"] {
            let err = decode(input, &key).unwrap_err();
            assert!(err.is_authentication(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_short_bodies_rejected_without_decrypting() {
        let key = SymmetricKey::generate();
        for len in [0usize, 3, 31, 40, 63] {
            let token = format!("{TOKEN_HEADER}{}", URL_SAFE_NO_PAD.encode(vec![0u8; len]));
            let err = decode(&token, &key).unwrap_err();
            assert!(err.is_authentication(), "len {len}: {err}");
            assert!(err.to_string().contains("too short"), "len {len}: {err}");
        }

        let token = format!("{TOKEN_HEADER}{}", URL_SAFE_NO_PAD.encode(vec![0u8; 64]));
        assert!(decode(&token, &key).unwrap_err().is_authentication());
    }

    #[test]
    fn test_body_that_is_not_base64_rejected() {
        let key = SymmetricKey::generate();
        let err = decode("v4.local.***", &key).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_authentic_payload_with_inverted_window_rejected() {
        let key = SymmetricKey::generate();
        let mut value = serde_json::to_value(sample_claims()).unwrap();
        value["iat"] = value["exp"].clone();
        value["nbf"] = value["exp"].clone();
        value["exp"] = serde_json::Value::String("2000-01-01T00:00:00Z".to_string());

        let nonce_key = Key::<32>::from([9u8; 32]);
        let nonce = PasetoNonce::<V4, Local>::from(&nonce_key);
        let payload = value.to_string();
        let token = Paseto::<V4, Local>::builder()
            .set_payload(Payload::from(payload.as_str()))
            .try_encrypt(&key.paseto_key(), &nonce)
            .unwrap();

        let err = decode(&token, &key).unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("not-before is later than expiration"));
    }

    #[test]
    fn test_non_claim_payload_rejected() {
        let key = SymmetricKey::generate();
        let nonce_key = Key::<32>::from([7u8; 32]);
        let nonce = PasetoNonce::<V4, Local>::from(&nonce_key);
        let token = Paseto::<V4, Local>::builder()
            .set_payload(Payload::from(r#"{"hello":"world"}"#))
            .try_encrypt(&key.paseto_key(), &nonce)
            .unwrap();

        let err = decode(&token, &key).unwrap_err();
        assert!(err.is_authentication());
    }
}
