//! # gatehouse-token
//!
//! Symmetric session tokens for Gatehouse.
//!
//! This crate provides functionality for:
//! - Generating and loading the 32-byte symmetric key
//! - Building immutable claim sets
//! - Encoding claim sets into PASETO `v4.local` tokens
//! - Decoding and authenticating tokens back into claim sets
//!
//! ## Token Format
//!
//! | Part | Content |
//! |------|---------|
//! | Header | `v4.local.` |
//! | Body | base64url(nonce ‖ XChaCha20 ciphertext ‖ BLAKE2b tag) |
//! | Plaintext | JSON claim set (`sub`, `aud`, `iss`, `jti`, `iat`, `nbf`, `exp`, `admin_id`) |
//!
//! Decoding authenticates the whole token before any claim is parsed, so a
//! tampered or foreign token never yields partial claims. Semantic checks
//! (audience, subject, validity window) live in `gatehouse-policy`.

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use claims::{ClaimSet, ClaimSetBuilder};
pub use error::TokenError;
pub use keys::SymmetricKey;
pub use token::{TOKEN_HEADER, TokenCodec, decode, encode};
