use argon2::{
    Argon2, PasswordHash, PasswordVerifier as _,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

/// Checks a plaintext password against a stored hash.
///
/// Called on the blocking pool; implementations may be slow on purpose.
pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Well-formed Argon2id hash, using the default cost parameters, that no
/// password matches. Verified against when a login names an unknown user.
pub const DUMMY_PASSWORD_HASH: &str = concat!(
    "$argon2id$v=19$m=19456,t=2,p=1$Z2F0ZWhvdXNlLWR1bW15IQ$",
    "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
);

/// Argon2 PHC-string verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl PasswordVerifier for Argon2Verifier {
    fn verify(&self, password: &str, hash: &str) -> bool {
        // An unparseable stored hash never matches.
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::error!("stored password hash is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hash a password into an Argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));

        assert!(Argon2Verifier.verify("correct horse", &hash));
        assert!(!Argon2Verifier.verify("battery staple", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_dummy_hash_parses_and_never_matches() {
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");

        assert!(!Argon2Verifier.verify("", DUMMY_PASSWORD_HASH));
        assert!(!Argon2Verifier.verify("changeme", DUMMY_PASSWORD_HASH));
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        assert!(!Argon2Verifier.verify("anything", "not-a-phc-string"));
        assert!(!Argon2Verifier.verify("", ""));
    }
}
