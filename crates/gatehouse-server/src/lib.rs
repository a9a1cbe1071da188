//! Gatehouse HTTP server.
//!
//! Routes:
//! - `POST /auth/login` exchanges admin credentials for a session token
//! - `GET /protected` and `GET /whoami` require `Authorization: Bearer <token>`
//! - `GET /healthz` is open

pub mod auth;
pub mod config;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use middleware::handlers;
use state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router. Protected routes sit behind [`middleware::require_bearer`].
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/protected", get(handlers::protected))
        .route("/whoami", get(handlers::whoami))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_bearer,
        ));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/auth/login", post(handlers::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
