//! Registration endpoint handler.
//!
//! Handles `POST /auth/register` with `{"username": ..., "password": ...}`.
//! The directory hashes the credential; duplicate-username policy is the
//! directory's concern, not this layer's.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;
use crate::http::token::AuthApiState;

/// Request body for `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Username for the new account.
    #[serde(default)]
    pub username: String,

    /// Plaintext credential; hashed by the directory, never stored here.
    #[serde(default)]
    pub password: String,
}

/// Registration endpoint handler.
pub async fn register_handler<S>(
    State(state): State<S>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, AuthError>
where
    AuthApiState: FromRef<S>,
{
    let state = AuthApiState::from_ref(&state);
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "Rejected malformed register request body");
        AuthError::invalid_request("malformed request body")
    })?;

    state
        .token_service
        .register(&request.username, &request.password)
        .await?;

    Ok(StatusCode::CREATED)
}
