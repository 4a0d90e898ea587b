//! Account type as seen by the auth core.
//!
//! The core only ever receives an authenticated account (or nothing) from
//! the [`UserDirectory`](crate::storage::UserDirectory); it never sees a
//! plaintext or hashed credential.

use serde::{Deserialize, Serialize};

/// An authenticated principal returned by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Directory-assigned numeric identifier.
    pub id: i64,

    /// Username the account authenticated with.
    pub username: String,
}
