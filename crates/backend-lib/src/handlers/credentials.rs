// ============================
// crates/backend-lib/src/handlers/credentials.rs
// ============================
//! Signup and login endpoints.
//!
//! Handlers validate the payload, call the `AuthService` and translate its
//! errors through `CredentialError`'s `IntoResponse` impl.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use credvault_common::{AuthPayload, AuthResponse};

use crate::error::CredentialError;
use crate::validation::{validate_credentials, ValidationError};
use crate::AppState;

fn parse_payload(
    payload: Result<Json<AuthPayload>, JsonRejection>,
) -> Result<AuthPayload, CredentialError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "rejected request body");
        ValidationError::MalformedRequest
    })?;
    validate_credentials(&payload.username, &payload.password)?;
    Ok(payload)
}

/// `POST /api/signup`
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthPayload>, JsonRejection>,
) -> Result<Json<AuthResponse>, CredentialError> {
    let payload = parse_payload(payload)?;
    let account = state
        .auth
        .register(&payload.username, &payload.password)
        .await?;
    Ok(Json(AuthResponse::signup(account.username)))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthPayload>, JsonRejection>,
) -> Result<Json<AuthResponse>, CredentialError> {
    let payload = parse_payload(payload)?;
    let account = state
        .auth
        .authenticate(&payload.username, &payload.password)
        .await?;
    Ok(Json(AuthResponse::login(account.username)))
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "Healthy"
}
