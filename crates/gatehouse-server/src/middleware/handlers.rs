use crate::auth::IssueError;
use crate::auth::models::{LoginRequest, LoginResponse};
use crate::middleware::auth::{Authenticated, AuthenticatedAdmin};
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "gatehouse-server" }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, IssueError> {
    let issued = state
        .issuer
        .issue(&req.username, &req.password, Utc::now())
        .await?;
    Ok(Json(issued.into()))
}

pub async fn protected(Authenticated(admin): Authenticated) -> String {
    format!("Protected resource accessed by admin ID: {}", admin.identity)
}

pub async fn whoami(Authenticated(admin): Authenticated) -> Json<AuthenticatedAdmin> {
    Json(admin)
}

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        match self {
            IssueError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid credentials").into_response()
            }
            other => {
                tracing::error!(error = %other, "token issuance failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}
