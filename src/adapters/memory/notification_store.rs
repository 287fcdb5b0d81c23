//! In-memory notification store for tests and local development.
//!
//! Provides synchronous, deterministic persistence without a database.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in
//! production. It uses `.expect()` on lock operations which will panic
//! if locks are poisoned. Production code uses the PostgreSQL adapter.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use crate::domain::foundation::{NotificationId, Timestamp};
use crate::domain::notification::{Notification, NotificationDraft};
use crate::ports::{NotificationStore, NotificationStoreError};

/// In-memory notification store.
///
/// Ids are assigned from an atomic counter starting at 1, so insertion
/// order and id order agree - `list_recent` exploits that.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned. This is acceptable
/// for test code but this adapter should NOT be used in production.
pub struct InMemoryNotificationStore {
    rows: RwLock<Vec<Notification>>,
    next_id: AtomicI64,
}

impl InMemoryNotificationStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Returns total row count (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn len(&self) -> usize {
        self.rows
            .read()
            .expect("InMemoryNotificationStore: rows lock poisoned")
            .len()
    }

    /// Returns true when the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, NotificationStoreError> {
        let id = NotificationId::from_i64(self.next_id.fetch_add(1, Ordering::SeqCst));
        let notification = Notification {
            id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            created_at: Timestamp::now(),
            read: false,
            data: draft.data.map(|d| d.to_value()),
        };

        self.rows
            .write()
            .expect("InMemoryNotificationStore: rows write lock poisoned")
            .push(notification.clone());

        Ok(notification)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Notification>, NotificationStoreError> {
        let rows = self
            .rows
            .read()
            .expect("InMemoryNotificationStore: rows lock poisoned");

        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn count_unread(&self) -> Result<u64, NotificationStoreError> {
        let rows = self
            .rows
            .read()
            .expect("InMemoryNotificationStore: rows lock poisoned");

        Ok(rows.iter().filter(|n| !n.read).count() as u64)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<bool, NotificationStoreError> {
        let mut rows = self
            .rows
            .write()
            .expect("InMemoryNotificationStore: rows write lock poisoned");

        match rows.iter_mut().find(|n| n.id == id && !n.read) {
            Some(row) => {
                row.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self) -> Result<u64, NotificationStoreError> {
        let mut rows = self
            .rows
            .write()
            .expect("InMemoryNotificationStore: rows write lock poisoned");

        let mut transitioned = 0;
        for row in rows.iter_mut().filter(|n| !n.read) {
            row.read = true;
            transitioned += 1;
        }
        Ok(transitioned)
    }

    async fn delete(&self, id: NotificationId) -> Result<bool, NotificationStoreError> {
        let mut rows = self
            .rows
            .write()
            .expect("InMemoryNotificationStore: rows write lock poisoned");

        let before = rows.len();
        rows.retain(|n| n.id != id);
        Ok(rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationKind;

    fn draft(title: &str) -> NotificationDraft {
        NotificationDraft::new(NotificationKind::Lead, title, "message")
    }

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() {
        let store = InMemoryNotificationStore::new();

        let first = store.insert(draft("a")).await.unwrap();
        let second = store.insert(draft("b")).await.unwrap();

        assert!(first.id < second.id);
        assert!(!first.read);
    }

    #[tokio::test]
    async fn list_recent_returns_newest_first() {
        let store = InMemoryNotificationStore::new();
        for title in ["premier", "deuxième", "troisième"] {
            store.insert(draft(title)).await.unwrap();
        }

        let recent = store.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "troisième");
        assert_eq!(recent[1].title, "deuxième");
    }

    #[tokio::test]
    async fn count_unread_covers_whole_store() {
        let store = InMemoryNotificationStore::new();
        for i in 0..5 {
            store.insert(draft(&format!("n{}", i))).await.unwrap();
        }

        assert_eq!(store.count_unread().await.unwrap(), 5);

        let recent = store.list_recent(1).await.unwrap();
        store.mark_read(recent[0].id).await.unwrap();

        assert_eq!(store.count_unread().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn mark_read_is_one_directional() {
        let store = InMemoryNotificationStore::new();
        let n = store.insert(draft("a")).await.unwrap();

        assert!(store.mark_read(n.id).await.unwrap());
        // Second call finds nothing to transition.
        assert!(!store.mark_read(n.id).await.unwrap());
    }

    #[tokio::test]
    async fn mark_read_of_unknown_id_is_benign() {
        let store = InMemoryNotificationStore::new();
        assert!(!store.mark_read(NotificationId::from_i64(999)).await.unwrap());
    }

    #[tokio::test]
    async fn mark_all_read_reports_transition_count() {
        let store = InMemoryNotificationStore::new();
        for i in 0..3 {
            store.insert(draft(&format!("n{}", i))).await.unwrap();
        }

        assert_eq!(store.mark_all_read().await.unwrap(), 3);
        assert_eq!(store.count_unread().await.unwrap(), 0);
        // Nothing left to transition.
        assert_eq!(store.mark_all_read().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = InMemoryNotificationStore::new();
        let n = store.insert(draft("a")).await.unwrap();

        assert!(store.delete(n.id).await.unwrap());
        assert!(!store.delete(n.id).await.unwrap());
        assert!(store.is_empty());
    }
}
