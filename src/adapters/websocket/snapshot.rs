//! Snapshot sender - full-state delivery for the notifications stream.
//!
//! Clients never receive deltas for read-state changes: on connect, and
//! after every mark-read mutation, they get the complete current
//! picture (recent list plus unread count over the whole store). The
//! full rebroadcast after mutations keeps every open admin session
//! showing the same read state.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::broadcast::Topic;
use crate::ports::NotificationStore;

use super::messages::{OutboundFrame, SnapshotMessage};
use super::registry::ConnectionRegistry;

/// Default number of notifications carried in a snapshot.
pub const DEFAULT_SNAPSHOT_LIMIT: u32 = 30;

/// Builds and delivers snapshot frames.
pub struct SnapshotSender {
    registry: Arc<ConnectionRegistry>,
    store: Arc<dyn NotificationStore>,
    limit: u32,
}

impl SnapshotSender {
    /// Creates a sender with the given page limit.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        store: Arc<dyn NotificationStore>,
        limit: u32,
    ) -> Self {
        Self {
            registry,
            store,
            limit,
        }
    }

    /// Builds the current snapshot frame. On store failure the error is
    /// logged and no frame is produced; callers simply skip sending.
    async fn build_frame(&self) -> Option<OutboundFrame> {
        let notifications = match self.store.list_recent(self.limit).await {
            Ok(notifications) => notifications,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load notifications for snapshot");
                return None;
            }
        };

        // Unread count covers the entire store, not just the page above.
        let unread_count = match self.store.count_unread().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Failed to count unread notifications");
                return None;
            }
        };

        Some(OutboundFrame::Text(
            SnapshotMessage::new(notifications, unread_count).to_json(),
        ))
    }

    /// Sends the current snapshot to a single connection's outbox.
    /// Used right after a connection registers.
    pub async fn send_to(&self, outbox: &mpsc::UnboundedSender<OutboundFrame>) {
        if let Some(frame) = self.build_frame().await {
            let _ = outbox.send(frame);
        }
    }

    /// Sends the current snapshot to every connection matching the
    /// notifications stream. Used after mark-read mutations so all open
    /// admin sessions converge on the same read state.
    pub async fn broadcast(&self) {
        if let Some(frame) = self.build_frame().await {
            let report = self.registry.fan_out(Topic::Notifications, &frame).await;
            tracing::trace!(delivered = report.delivered, "Snapshot broadcast complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryNotificationStore;
    use crate::domain::foundation::ConnectionId;
    use crate::domain::notification::{NotificationDraft, NotificationKind};

    async fn seeded_store(count: usize) -> Arc<InMemoryNotificationStore> {
        let store = Arc::new(InMemoryNotificationStore::new());
        for i in 0..count {
            store
                .insert(NotificationDraft::new(
                    NotificationKind::Lead,
                    format!("Lead {}", i),
                    "message",
                ))
                .await
                .unwrap();
        }
        store
    }

    fn parse_snapshot(frame: OutboundFrame) -> serde_json::Value {
        let OutboundFrame::Text(text) = frame else {
            panic!("expected a text frame");
        };
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn snapshot_carries_page_and_whole_store_unread_count() {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = seeded_store(5).await;
        // Page limit below row count: the count must still cover all 5.
        let sender = SnapshotSender::new(registry, store, 2);

        let (tx, mut rx) = mpsc::unbounded_channel();
        sender.send_to(&tx).await;

        let json = parse_snapshot(rx.recv().await.unwrap());
        assert_eq!(json["type"], "notifications");
        assert_eq!(json["notifications"].as_array().unwrap().len(), 2);
        assert_eq!(json["unreadCount"], 5);
    }

    #[tokio::test]
    async fn snapshot_lists_newest_first() {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = seeded_store(3).await;
        let sender = SnapshotSender::new(registry, store, DEFAULT_SNAPSHOT_LIMIT);

        let (tx, mut rx) = mpsc::unbounded_channel();
        sender.send_to(&tx).await;

        let json = parse_snapshot(rx.recv().await.unwrap());
        let notifications = json["notifications"].as_array().unwrap();
        assert_eq!(notifications[0]["title"], "Lead 2");
        assert_eq!(notifications[2]["title"], "Lead 0");
    }

    #[tokio::test]
    async fn broadcast_reaches_unsubscribed_and_notifications_subscribers() {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = seeded_store(1).await;
        let sender = SnapshotSender::new(registry.clone(), store, DEFAULT_SNAPSHOT_LIMIT);

        let everything = ConnectionId::new();
        let (everything_tx, mut everything_rx) = mpsc::unbounded_channel();
        registry.register(everything, everything_tx).await;

        let notifications = ConnectionId::new();
        let (notifications_tx, mut notifications_rx) = mpsc::unbounded_channel();
        registry.register(notifications, notifications_tx).await;
        registry
            .set_subscription(notifications, Some(Topic::Notifications))
            .await;

        let leads_only = ConnectionId::new();
        let (leads_tx, mut leads_rx) = mpsc::unbounded_channel();
        registry.register(leads_only, leads_tx).await;
        registry.set_subscription(leads_only, Some(Topic::Leads)).await;

        sender.broadcast().await;

        assert!(everything_rx.try_recv().is_ok());
        assert!(notifications_rx.try_recv().is_ok());
        assert!(leads_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn read_state_is_reflected_in_subsequent_snapshots() {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = seeded_store(4).await;
        let sender =
            SnapshotSender::new(registry, store.clone(), DEFAULT_SNAPSHOT_LIMIT);

        store.mark_all_read().await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        sender.send_to(&tx).await;

        let json = parse_snapshot(rx.recv().await.unwrap());
        assert_eq!(json["unreadCount"], 0);
        for notification in json["notifications"].as_array().unwrap() {
            assert_eq!(notification["read"], true);
        }
    }
}
