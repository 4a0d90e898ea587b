//! In-memory user directory with argon2 credential hashing.

use std::sync::atomic::{AtomicI64, Ordering};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use keymint_auth::storage::UserDirectory;
use keymint_auth::types::Account;
use keymint_auth::{AuthError, AuthResult};

struct StoredAccount {
    id: i64,
    password_hash: String,
}

/// User directory backed by a concurrent map keyed by username.
///
/// Credentials are argon2-hashed on creation; authentication does an
/// irreversible hash compare and reports an unknown username exactly like a
/// wrong password. Creating an account under an existing username replaces
/// it (uniqueness policy lives here, not in the auth core).
#[derive(Default)]
pub struct MemoryUserDirectory {
    accounts: DashMap<String, StoredAccount>,
    next_id: AtomicI64,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> AuthResult<Option<Account>> {
        let Some(entry) = self.accounts.get(username) else {
            // Unknown username looks exactly like a wrong password.
            return Ok(None);
        };

        let parsed = PasswordHash::new(&entry.password_hash)
            .map_err(|e| AuthError::storage(format!("corrupt password hash: {e}")))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(None);
        }

        Ok(Some(Account {
            id: entry.id,
            username: username.to_string(),
        }))
    }

    async fn create(&self, username: &str, password: &str) -> AuthResult<()> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::storage(format!("failed to hash password: {e}")))?
            .to_string();

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.accounts.insert(
            username.to_string(),
            StoredAccount { id, password_hash },
        );

        debug!(username, "Account stored");
        Ok(())
    }
}
