use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use gatehouse_policy::ValidationError;
use gatehouse_token::{ClaimSet, TokenError};
use serde::Serialize;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to a request once its bearer token passed every check.
///
/// Stored in request extensions keyed by this type; only this middleware
/// inserts it.
#[derive(Clone, Debug, Serialize)]
pub struct AuthenticatedAdmin {
    pub identity: String,
    pub unique_id: String,
    pub issuer: String,
    pub expires_at: DateTime<Utc>,
}

impl From<ClaimSet> for AuthenticatedAdmin {
    fn from(claims: ClaimSet) -> Self {
        Self {
            identity: claims.identity().to_string(),
            unique_id: claims.unique_id().to_string(),
            issuer: claims.issuer().to_string(),
            expires_at: claims.expiration(),
        }
    }
}

/// Why a request was turned away. Always 401.
#[derive(Debug)]
pub enum AuthRejection {
    /// `Authorization` absent or not `Bearer `-prefixed.
    MalformedHeader,
    /// Token failed decoding or a claim rule. `detail` is only set when
    /// error details are exposed.
    InvalidToken { detail: Option<String> },
    /// A handler asked for an identity the middleware never attached.
    Unauthenticated,
}

impl AuthRejection {
    pub fn message(&self) -> String {
        match self {
            AuthRejection::MalformedHeader => {
                "missing or malformed authorization header".to_string()
            }
            AuthRejection::InvalidToken { detail: None } => "invalid token".to_string(),
            AuthRejection::InvalidToken { detail: Some(d) } => format!("invalid token: {d}"),
            AuthRejection::Unauthenticated => "authentication required".to_string(),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            self.message(),
        )
            .into_response()
    }
}

/// Internal cause of a token rejection. Logged, never sent by default.
#[derive(Debug)]
enum TokenFailure {
    Decode(TokenError),
    Rule(ValidationError),
}

impl std::fmt::Display for TokenFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenFailure::Decode(e) => write!(f, "{e}"),
            TokenFailure::Rule(e) => write!(f, "{e}"),
        }
    }
}

/// Axum middleware admitting only requests with a valid bearer token:
/// - `Authorization` must start with exactly `Bearer `
/// - the token must decode under the shared key
/// - every claim rule must pass at the current time
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let Some(token) = extract_bearer(req.headers()) else {
        tracing::warn!(
            path = %req.uri().path(),
            "rejected request: missing or malformed authorization header"
        );
        return Err(AuthRejection::MalformedHeader);
    };

    let admin = authenticate(&state, token, Utc::now()).map_err(|failure| {
        log_failure(&failure);
        AuthRejection::InvalidToken {
            detail: state
                .cfg
                .server
                .expose_error_details
                .then(|| failure.to_string()),
        }
    })?;

    tracing::debug!(admin_id = %admin.identity, jti = %admin.unique_id, "bearer token accepted");
    req.extensions_mut().insert(admin);

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

fn authenticate(
    state: &AppState,
    token: &str,
    now: DateTime<Utc>,
) -> Result<AuthenticatedAdmin, TokenFailure> {
    let claims = state.codec.decode(token).map_err(TokenFailure::Decode)?;
    state
        .validator
        .validate(&claims, now)
        .map_err(TokenFailure::Rule)?;
    Ok(claims.into())
}

fn log_failure(failure: &TokenFailure) {
    match failure {
        TokenFailure::Decode(err) => {
            tracing::warn!(error = %err, "rejected request: token failed authentication");
        }
        TokenFailure::Rule(err) if err.is_temporal() => {
            tracing::warn!(
                rule = err.rule,
                kind = err.kind.code(),
                "rejected request: {}",
                err.message
            );
        }
        TokenFailure::Rule(err) => {
            tracing::warn!(
                rule = err.rule,
                kind = err.kind.code(),
                "rejected request: claim rule failed"
            );
        }
    }
}

/// Extractor for the identity attached by [`require_bearer`].
///
/// ```rust,ignore
/// async fn handler(Authenticated(admin): Authenticated) -> String {
///     admin.identity
/// }
/// ```
pub struct Authenticated(pub AuthenticatedAdmin);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAdmin>()
            .cloned()
            .map(Authenticated)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers("Bearer ")), Some(""));
    }

    #[test]
    fn test_extract_bearer_prefix_is_exact() {
        assert_eq!(extract_bearer(&headers("bearer abc")), None);
        assert_eq!(extract_bearer(&headers("BEARER abc")), None);
        assert_eq!(extract_bearer(&headers("Bearerabc")), None);
        assert_eq!(extract_bearer(&headers("Basic YWRtaW46cGFzcw==")), None);
        assert_eq!(extract_bearer(&headers("abc")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            AuthRejection::MalformedHeader.message(),
            "missing or malformed authorization header"
        );
        assert_eq!(
            AuthRejection::InvalidToken { detail: None }.message(),
            "invalid token"
        );
        assert_eq!(
            AuthRejection::InvalidToken {
                detail: Some("rule 'audience' failed".to_string())
            }
            .message(),
            "invalid token: rule 'audience' failed"
        );
    }

    #[test]
    fn test_rejection_is_401_with_challenge() {
        let resp = AuthRejection::InvalidToken { detail: None }.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }
}
