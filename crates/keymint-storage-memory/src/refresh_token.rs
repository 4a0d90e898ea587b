//! In-memory refresh token store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use keymint_auth::storage::RefreshTokenStorage;
use keymint_auth::types::StoredRefreshToken;
use keymint_auth::{AuthError, AuthResult};

/// Refresh token store backed by a concurrent map keyed by token value.
///
/// Keying by value gives the at-most-one-live-row-per-value invariant for
/// free: creating a duplicate value replaces the old row.
#[derive(Default)]
pub struct MemoryRefreshTokenStorage {
    rows: DashMap<String, StoredRefreshToken>,
    next_id: AtomicI64,
}

impl MemoryRefreshTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of live rows, for tests and diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStorage for MemoryRefreshTokenStorage {
    async fn create(&self, value: &str, subject_id: i64) -> AuthResult<StoredRefreshToken> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = StoredRefreshToken::new(id, value, subject_id);
        self.rows.insert(value.to_string(), row.clone());
        Ok(row)
    }

    async fn find_by_value(&self, value: &str) -> AuthResult<Option<StoredRefreshToken>> {
        Ok(self.rows.get(value).map(|entry| entry.clone()))
    }

    async fn update(&self, row: &StoredRefreshToken) -> AuthResult<()> {
        match self.rows.get_mut(&row.value) {
            Some(mut entry) => {
                *entry = row.clone();
                Ok(())
            }
            None => Err(AuthError::storage("refresh token row no longer exists")),
        }
    }

    async fn delete(&self, row: &StoredRefreshToken) -> AuthResult<()> {
        self.rows.remove(&row.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryRefreshTokenStorage::new();
        let a = store.create("tok-a", 1).await.unwrap();
        let b = store.create("tok-b", 2).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_value() {
        let store = MemoryRefreshTokenStorage::new();
        store.create("tok", 7).await.unwrap();

        let row = store.find_by_value("tok").await.unwrap().unwrap();
        assert_eq!(row.subject_id, 7);
        assert!(store.find_by_value("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_value_replaces_row() {
        let store = MemoryRefreshTokenStorage::new();
        store.create("tok", 1).await.unwrap();
        store.create("tok", 2).await.unwrap();

        assert_eq!(store.len(), 1);
        let row = store.find_by_value("tok").await.unwrap().unwrap();
        assert_eq!(row.subject_id, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryRefreshTokenStorage::new();
        let mut row = store.create("tok", 1).await.unwrap();

        row.stamp();
        store.update(&row).await.unwrap();

        store.delete(&row).await.unwrap();
        assert!(store.find_by_value("tok").await.unwrap().is_none());

        // Updating a deleted row fails.
        assert!(store.update(&row).await.is_err());
        // Deleting again is a no-op.
        store.delete(&row).await.unwrap();
    }
}
