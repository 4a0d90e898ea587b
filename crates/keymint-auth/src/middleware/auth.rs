//! Bearer token extractor.
//!
//! Validates that an inbound request carries a valid, unexpired *access*
//! token and attaches the authenticated subject to the request scope.
//! No store lookup happens here: access tokens are self-contained, which is
//! why they carry a short TTL instead of persisted revocation.
//!
//! # Example
//!
//! ```ignore
//! async fn me_handler(BearerAuth(subject): BearerAuth) -> Json<MeResponse> {
//!     Json(MeResponse { uid: subject.id })
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::error::AuthError;
use crate::token::claims::TokenKind;
use crate::token::jwt::{JwtError, JwtService};

/// State required for bearer token authentication.
///
/// Include in the application state and expose via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// JWT service for token verification.
    pub jwt_service: Arc<JwtService>,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }
}

/// The authenticated subject attached to the request scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    /// Numeric id of the authenticated principal.
    pub id: i64,
}

/// Axum extractor that validates a bearer access token.
///
/// 1. Extracts the token from the `Authorization` header (case-insensitive
///    `bearer ` prefix, nonempty remainder)
/// 2. Verifies signature, algorithm, and embedded expiry
/// 3. Requires the claim kind to be `Access`; a refresh token presented
///    here is rejected
pub struct BearerAuth(pub Subject);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = bearer_token(parts)
            .ok_or_else(|| AuthError::unauthorized("missing bearer token"))?;

        let claims = auth_state.jwt_service.verify(&token).map_err(|e| {
            debug!(error = %e, "Access token verification failed");
            match e {
                JwtError::Expired => AuthError::TokenExpired,
                other => AuthError::invalid_token(other.to_string()),
            }
        })?;

        if claims.kind != TokenKind::Access {
            debug!(uid = claims.sub, "Non-access token presented as bearer credential");
            return Err(AuthError::invalid_token("not an access token"));
        }

        Ok(BearerAuth(Subject { id: claims.sub }))
    }
}

/// Extracts the bearer token from the authorization header.
///
/// Requires a case-insensitive `bearer ` prefix with a nonempty remainder;
/// anything else is treated as no token at all.
fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?.trim();

    if header.len() < 8 || !header[..7].eq_ignore_ascii_case("bearer ") {
        return None;
    }

    let token = header[7..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let request = Request::builder()
            .uri("/")
            .header(AUTHORIZATION, value)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_prefix_is_case_insensitive() {
        for prefix in ["bearer", "BEARER", "BeArEr"] {
            let parts = parts_with_auth(&format!("{prefix} tok"));
            assert_eq!(bearer_token(&parts).as_deref(), Some("tok"));
        }
    }

    #[test]
    fn test_non_bearer_schemes_yield_no_token() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "tok", ""] {
            let parts = parts_with_auth(value);
            assert!(bearer_token(&parts).is_none(), "value: {value:?}");
        }
    }

    #[test]
    fn test_missing_header_yields_no_token() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let parts = request.into_parts().0;
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let parts = parts_with_auth("  Bearer   tok  ");
        assert_eq!(bearer_token(&parts).as_deref(), Some("tok"));
    }
}
