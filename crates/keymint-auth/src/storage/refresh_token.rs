//! Refresh token storage trait.
//!
//! Rows are queried by exact match on the token value, which is expected to
//! be unique. Backends that cannot enforce uniqueness are compensated for by
//! the core's subject-match check during validation.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::StoredRefreshToken;

/// Persistence capability for refresh tokens.
///
/// Implementations own the row's storage identity; the token service owns
/// the business semantics (what "expired" and "valid" mean).
#[async_trait]
pub trait RefreshTokenStorage: Send + Sync {
    /// Stores a new refresh token row stamped with the current time.
    ///
    /// Returns the created row with its store-assigned id.
    ///
    /// # Errors
    /// Returns an error if the row cannot be stored.
    async fn create(&self, value: &str, subject_id: i64) -> AuthResult<StoredRefreshToken>;

    /// Finds a refresh token row by its exact value.
    ///
    /// Returns `None` if no row matches. Expiry is not evaluated here;
    /// that is the caller's policy.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    async fn find_by_value(&self, value: &str) -> AuthResult<Option<StoredRefreshToken>>;

    /// Writes back an updated row (used for the last-access bump).
    ///
    /// # Errors
    /// Returns an error if the write fails.
    async fn update(&self, row: &StoredRefreshToken) -> AuthResult<()>;

    /// Deletes a row (expired-on-access cleanup or explicit revocation).
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    async fn delete(&self, row: &StoredRefreshToken) -> AuthResult<()>;
}
