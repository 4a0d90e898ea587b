//! Token service: grant flows and the store-backed validation policy.
//!
//! This is the orchestration layer between the user directory, the signer,
//! and the refresh-token store. All collaborator calls are bounded by a
//! per-call deadline; the last-access bump and the expired-row cleanup run
//! as detached tasks off the request path.

use std::future::Future;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::AuthResult;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::storage::{RefreshTokenStorage, UserDirectory};
use crate::token::claims::{TokenClaims, TokenKind};
use crate::token::jwt::JwtService;
use crate::token::protocol::TokenResponse;

/// Orchestrates credential exchanges against the directory, signer, and
/// token store.
pub struct TokenService {
    /// Signer/verifier for both token kinds.
    jwt_service: Arc<JwtService>,

    /// Account lookup and creation.
    users: Arc<dyn UserDirectory>,

    /// Refresh token persistence.
    refresh_tokens: Arc<dyn RefreshTokenStorage>,

    /// Service configuration.
    config: AuthConfig,
}

impl TokenService {
    /// Creates a new token service.
    #[must_use]
    pub fn new(
        jwt_service: Arc<JwtService>,
        users: Arc<dyn UserDirectory>,
        refresh_tokens: Arc<dyn RefreshTokenStorage>,
        config: AuthConfig,
    ) -> Self {
        Self {
            jwt_service,
            users,
            refresh_tokens,
            config,
        }
    }

    /// Handles the password grant.
    ///
    /// On success, persists a new refresh token and returns both tokens.
    /// A wrong username and a wrong password are indistinguishable: both
    /// collapse to the same `Unauthorized`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if username or password is empty
    /// - `Unauthorized` if the credentials do not match an account
    /// - `Storage` if the directory or store call fails or times out
    pub async fn password_grant(&self, username: &str, password: &str) -> AuthResult<TokenResponse> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::invalid_request(
                "username and password are required",
            ));
        }

        let account = self
            .bounded("authenticate", self.users.authenticate(username, password))
            .await?
            .ok_or_else(|| AuthError::unauthorized("invalid credentials"))?;

        let refresh_claims = TokenClaims::new(account.id, TokenKind::Refresh, std::time::Duration::ZERO);
        let refresh_token = self
            .jwt_service
            .issue(&refresh_claims)
            .map_err(|e| AuthError::internal(e.to_string()))?;

        self.bounded(
            "refresh_token_create",
            self.refresh_tokens.create(&refresh_token, account.id),
        )
        .await?;

        let (access_token, expires_in) = self.issue_access_token(account.id)?;

        info!(uid = account.id, "Password grant succeeded");

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
            refresh_token: Some(refresh_token),
            uid: account.id,
        })
    }

    /// Handles the refresh grant.
    ///
    /// Verifies the presented token is a signed refresh token, validates it
    /// against the store (sliding window), and mints a fresh access token.
    /// The refresh token is not rotated; only its last-access time moves.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the refresh token is empty
    /// - `Unauthorized` for any signature, kind, or store-validation failure
    /// - `Storage` if the store call fails or times out
    pub async fn refresh_grant(&self, refresh_token: &str) -> AuthResult<TokenResponse> {
        if refresh_token.is_empty() {
            return Err(AuthError::invalid_request("refresh_token is required"));
        }

        let claims = self.jwt_service.verify(refresh_token).map_err(|e| {
            debug!(error = %e, "Refresh token verification failed");
            AuthError::unauthorized("invalid refresh token")
        })?;

        if claims.kind != TokenKind::Refresh {
            debug!(uid = claims.sub, "Non-refresh token presented to refresh grant");
            return Err(AuthError::unauthorized("invalid refresh token"));
        }

        if !self.validate_stored_token(refresh_token, claims.sub).await? {
            return Err(AuthError::unauthorized("invalid refresh token"));
        }

        let (access_token, expires_in) = self.issue_access_token(claims.sub)?;

        info!(uid = claims.sub, "Refresh grant succeeded");

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
            refresh_token: None,
            uid: claims.sub,
        })
    }

    /// Registers a new account.
    ///
    /// The directory hashes the credential before storage; this layer never
    /// sees the hash and imposes no uniqueness policy.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if username or password is empty
    /// - `Storage` if the directory call fails or times out
    pub async fn register(&self, username: &str, password: &str) -> AuthResult<()> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::invalid_request(
                "username and password are required",
            ));
        }

        self.bounded("user_create", self.users.create(username, password))
            .await?;

        info!(username, "Account registered");
        Ok(())
    }

    /// Validates a refresh token against its persisted row with sliding
    /// expiry.
    ///
    /// Returns `false` for a missing row, a subject mismatch, or an idle
    /// window overrun. The validation result is computed from the state read
    /// at call time; the last-access bump and the expired-row delete are
    /// detached best-effort writes that never block the response and whose
    /// failures are only logged. Two concurrent validations of the same
    /// token may therefore both succeed and both schedule a bump; that is
    /// accepted, not serialized.
    ///
    /// # Errors
    ///
    /// Returns `Storage` only for lookup I/O failures or a deadline overrun.
    pub async fn validate_stored_token(&self, value: &str, subject_id: i64) -> AuthResult<bool> {
        let row = match self
            .bounded("refresh_token_find", self.refresh_tokens.find_by_value(value))
            .await?
        {
            Some(row) => row,
            None => return Ok(false),
        };

        if row.subject_id != subject_id {
            debug!(
                token_id = row.id,
                "Refresh token subject mismatch"
            );
            return Ok(false);
        }

        let now = OffsetDateTime::now_utc();
        if row.is_idle_expired(self.config.refresh_idle_window, now) {
            let storage = Arc::clone(&self.refresh_tokens);
            tokio::spawn(async move {
                if let Err(err) = storage.delete(&row).await {
                    warn!(error = %err, token_id = row.id, "Failed to delete expired refresh token");
                }
            });
            return Ok(false);
        }

        let mut row = row;
        row.stamp();
        let storage = Arc::clone(&self.refresh_tokens);
        tokio::spawn(async move {
            if let Err(err) = storage.update(&row).await {
                warn!(error = %err, token_id = row.id, "Failed to bump refresh token last access");
            }
        });

        Ok(true)
    }

    /// Explicitly revokes a refresh token by deleting its row.
    ///
    /// Revoking a token that has no row is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the lookup or delete fails or times out.
    pub async fn revoke_refresh_token(&self, value: &str) -> AuthResult<()> {
        let row = self
            .bounded("refresh_token_find", self.refresh_tokens.find_by_value(value))
            .await?;

        if let Some(row) = row {
            self.bounded("refresh_token_delete", self.refresh_tokens.delete(&row))
                .await?;
            info!(token_id = row.id, uid = row.subject_id, "Refresh token revoked");
        }

        Ok(())
    }

    /// Mints a signed access token for the subject with the configured TTL.
    fn issue_access_token(&self, subject_id: i64) -> AuthResult<(String, u64)> {
        let ttl = self.config.access_token_ttl;
        let claims = TokenClaims::new(subject_id, TokenKind::Access, ttl);
        let token = self
            .jwt_service
            .issue(&claims)
            .map_err(|e| AuthError::internal(e.to_string()))?;
        Ok((token, ttl.as_secs()))
    }

    /// Runs a collaborator call under the configured per-call deadline.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> AuthResult<T>
    where
        F: Future<Output = AuthResult<T>>,
    {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, "Backend call exceeded deadline");
                Err(AuthError::storage(format!("{op} exceeded deadline")))
            }
        }
    }
}
