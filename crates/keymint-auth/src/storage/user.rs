//! User directory trait.
//!
//! Password comparison is opaque to the core: the directory does an
//! irreversible hash compare internally and hands back either an
//! authenticated account or nothing. The core must never inspect or log
//! the credential.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Account;

/// Account lookup and creation capability.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Authenticates a username/password pair.
    ///
    /// Returns `None` for an unknown username *and* for a wrong password;
    /// the two cases must be indistinguishable to callers.
    ///
    /// # Errors
    /// Returns an error only for backend I/O failures, never for a failed
    /// credential check.
    async fn authenticate(&self, username: &str, password: &str) -> AuthResult<Option<Account>>;

    /// Creates an account, hashing the credential before storage.
    ///
    /// Duplicate-username policy is a directory concern; this layer imposes
    /// none.
    ///
    /// # Errors
    /// Returns an error if the account cannot be stored.
    async fn create(&self, username: &str, password: &str) -> AuthResult<()>;
}
