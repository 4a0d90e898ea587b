//! Token endpoint handler.
//!
//! Handles `POST /auth` with a JSON body:
//!
//! ```json
//! {"grant_type": "password", "username": "alice", "password": "secret123"}
//! {"grant_type": "refresh_token", "refresh_token": "<token>"}
//! ```
//!
//! An unrecognized `grant_type` is answered with the same `Unauthorized` as
//! a denied credential, so the endpoint does not advertise which grants
//! exist.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::token::protocol::{AuthRequest, GrantType, TokenResponse};
use crate::token::service::TokenService;

/// State required by the auth endpoint handlers.
#[derive(Clone)]
pub struct AuthApiState {
    /// Token service driving the grant flows.
    pub token_service: Arc<TokenService>,
}

impl AuthApiState {
    /// Creates a new handler state.
    #[must_use]
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }
}

/// Token endpoint handler dispatching on `grant_type`.
pub async fn token_handler<S>(
    State(state): State<S>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError>
where
    AuthApiState: FromRef<S>,
{
    let state = AuthApiState::from_ref(&state);
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "Rejected malformed token request body");
        AuthError::invalid_request("malformed request body")
    })?;

    debug!(grant_type = ?request.grant_type, "Processing token request");

    let response = match request.grant_type {
        GrantType::Password => {
            state
                .token_service
                .password_grant(
                    request.username.as_deref().unwrap_or_default(),
                    request.password.as_deref().unwrap_or_default(),
                )
                .await?
        }
        GrantType::RefreshToken => {
            state
                .token_service
                .refresh_grant(request.refresh_token.as_deref().unwrap_or_default())
                .await?
        }
        GrantType::Unknown => {
            warn!("Unrecognized grant type in token request");
            return Err(AuthError::unauthorized("unrecognized grant type"));
        }
    };

    Ok(Json(response))
}
