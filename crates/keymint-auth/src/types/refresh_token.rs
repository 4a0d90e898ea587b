//! Persisted refresh token row.
//!
//! The store owns the row's identity; the token service owns what "valid"
//! and "expired" mean. There is at most one live row per token value.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A refresh token row in the token store.
///
/// `last_access_at` drives the sliding window: the row expires once the gap
/// since the last successful validation exceeds the configured idle window,
/// regardless of how old the row itself is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRefreshToken {
    /// Store-assigned identity.
    pub id: i64,

    /// The signed refresh-token string; unique business key.
    /// Never serialized outward.
    #[serde(skip_serializing, default)]
    pub value: String,

    /// Owner of this token. A validation request must match both `value`
    /// and the caller-asserted subject.
    pub subject_id: i64,

    /// Set once at creation, never mutated afterwards.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Updated on every successful validation.
    #[serde(with = "time::serde::rfc3339")]
    pub last_access_at: OffsetDateTime,
}

impl StoredRefreshToken {
    /// Creates a fresh row stamped with the current time.
    #[must_use]
    pub fn new(id: i64, value: impl Into<String>, subject_id: i64) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            value: value.into(),
            subject_id,
            created_at: now,
            last_access_at: now,
        }
    }

    /// Stamps the row with the current time.
    ///
    /// Moves `last_access_at` to now; `created_at` is only initialized if it
    /// was never set (epoch sentinel).
    pub fn stamp(&mut self) {
        self.last_access_at = OffsetDateTime::now_utc();
        if self.created_at == OffsetDateTime::UNIX_EPOCH {
            self.created_at = self.last_access_at;
        }
    }

    /// Returns `true` if the gap since the last successful use exceeds the
    /// sliding window.
    #[must_use]
    pub fn is_idle_expired(&self, window: std::time::Duration, now: OffsetDateTime) -> bool {
        now > self.last_access_at + window
    }
}
