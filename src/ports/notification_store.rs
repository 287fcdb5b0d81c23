//! NotificationStore port - persistence interface for notifications.
//!
//! The broadcast core never touches the database directly; it persists
//! and queries notifications through this port. The database provides
//! its own consistency - implementations are externally synchronized
//! and hold no in-process locks the broadcast path could contend on.

use async_trait::async_trait;

use crate::domain::foundation::NotificationId;
use crate::domain::notification::{Notification, NotificationDraft};

/// Errors that can occur in notification store operations.
#[derive(Debug, thiserror::Error)]
pub enum NotificationStoreError {
    /// Database communication or query error
    #[error("database error: {0}")]
    Database(String),

    /// Stored or supplied payload could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting notification records.
///
/// Implementations must assign ids monotonically and keep the
/// unread -> read transition one-directional: nothing ever flips a
/// notification back to unread.
///
/// # Example
///
/// ```ignore
/// let notification = store
///     .insert(NotificationDraft::new(NotificationKind::Lead, "Nouveau lead", "Marie Dupont"))
///     .await?;
/// assert!(!notification.read);
/// ```
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persists a draft and returns the stored record with its assigned
    /// id and creation timestamp. New notifications are always unread.
    async fn insert(&self, draft: NotificationDraft)
        -> Result<Notification, NotificationStoreError>;

    /// Returns the most recent notifications, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<Notification>, NotificationStoreError>;

    /// Counts unread notifications over the entire store, not a page.
    async fn count_unread(&self) -> Result<u64, NotificationStoreError>;

    /// Marks one notification read. Returns false if the id does not
    /// exist or was already read; both are benign.
    async fn mark_read(&self, id: NotificationId) -> Result<bool, NotificationStoreError>;

    /// Marks every unread notification read. Returns how many rows
    /// transitioned.
    async fn mark_all_read(&self) -> Result<u64, NotificationStoreError>;

    /// Deletes one notification. Administrative rollback and test
    /// cleanup only; never called during normal operation.
    async fn delete(&self, id: NotificationId) -> Result<bool, NotificationStoreError>;
}
