pub mod bootstrap;
pub mod issuer;
pub mod models;
pub mod password;
pub mod store;

pub use issuer::{IssueError, Issuer};
pub use models::{CredentialRecord, IssuedToken};
pub use password::{Argon2Verifier, PasswordVerifier};
pub use store::{CredentialStore, InMemoryCredentialStore};
