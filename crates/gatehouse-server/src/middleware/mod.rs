pub mod auth;
pub mod handlers;

pub use auth::{AuthRejection, Authenticated, AuthenticatedAdmin, require_bearer};
