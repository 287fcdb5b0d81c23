//! Broadcast engine - the single entry point for domain events.
//!
//! Producers elsewhere in the application (lead creation, payment
//! webhooks, email ingestion) call [`BroadcastEngine::publish`]; the
//! engine persists the attached notification (if any) and fans the
//! envelope out to every matching connection.
//!
//! # Ordering
//!
//! The persistence call completes before any frame is enqueued, so a
//! notification is always observable in the store by the time a client
//! sees its broadcast. The registry lock is never held across the store
//! call.

use std::sync::Arc;

use crate::domain::broadcast::DomainEvent;
use crate::ports::NotificationStore;

use super::messages::{broadcast_envelope, OutboundFrame};
use super::registry::ConnectionRegistry;

/// Fans domain events out to connected admin sessions.
pub struct BroadcastEngine {
    registry: Arc<ConnectionRegistry>,
    store: Arc<dyn NotificationStore>,
}

impl BroadcastEngine {
    /// Creates an engine over the given registry and store.
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<dyn NotificationStore>) -> Self {
        Self { registry, store }
    }

    /// Publishes a domain event.
    ///
    /// Infallible from the producer's point of view: transport failures
    /// are isolated per connection, and a persistence failure is logged
    /// and skips the broadcast (no frame is sent for data that failed
    /// to persist). With an empty registry the persistence step still
    /// runs - notifications are never lost for lack of viewers.
    pub async fn publish(&self, event: DomainEvent) {
        if let Some(draft) = &event.notification {
            if let Err(e) = self.store.insert(draft.clone()).await {
                tracing::error!(
                    error = %e,
                    topic = %event.topic,
                    "Notification persistence failed; skipping broadcast"
                );
                return;
            }
        }

        let frame = OutboundFrame::Text(broadcast_envelope(&event));
        let report = self.registry.fan_out(event.topic, &frame).await;
        tracing::trace!(
            event_type = %event.wire_type(),
            delivered = report.delivered,
            "Broadcast complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryNotificationStore;
    use crate::domain::broadcast::{EventKind, Topic};
    use crate::domain::foundation::ConnectionId;
    use crate::domain::notification::{NotificationDraft, NotificationKind};
    use crate::ports::NotificationStoreError;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    /// Store that rejects every operation, for persistence-failure paths.
    struct FailingStore;

    #[async_trait]
    impl NotificationStore for FailingStore {
        async fn insert(
            &self,
            _draft: NotificationDraft,
        ) -> Result<crate::domain::notification::Notification, NotificationStoreError> {
            Err(NotificationStoreError::Database("store offline".to_string()))
        }

        async fn list_recent(
            &self,
            _limit: u32,
        ) -> Result<Vec<crate::domain::notification::Notification>, NotificationStoreError> {
            Err(NotificationStoreError::Database("store offline".to_string()))
        }

        async fn count_unread(&self) -> Result<u64, NotificationStoreError> {
            Err(NotificationStoreError::Database("store offline".to_string()))
        }

        async fn mark_read(
            &self,
            _id: crate::domain::foundation::NotificationId,
        ) -> Result<bool, NotificationStoreError> {
            Err(NotificationStoreError::Database("store offline".to_string()))
        }

        async fn mark_all_read(&self) -> Result<u64, NotificationStoreError> {
            Err(NotificationStoreError::Database("store offline".to_string()))
        }

        async fn delete(
            &self,
            _id: crate::domain::foundation::NotificationId,
        ) -> Result<bool, NotificationStoreError> {
            Err(NotificationStoreError::Database("store offline".to_string()))
        }
    }

    fn lead_event() -> DomainEvent {
        DomainEvent::new(
            Topic::Leads,
            EventKind::New,
            serde_json::json!({"id": 7}),
        )
        .with_notification(NotificationDraft::new(
            NotificationKind::Lead,
            "Nouveau lead",
            "Marie Dupont - Lyon",
        ))
    }

    #[tokio::test]
    async fn publish_persists_before_broadcasting() {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = Arc::new(InMemoryNotificationStore::new());
        let engine = BroadcastEngine::new(registry.clone(), store.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(ConnectionId::new(), tx).await;

        engine.publish(lead_event()).await;

        // The record is durable...
        assert_eq!(store.len(), 1);
        // ...and the frame reached the connection.
        let frame = rx.recv().await.expect("frame should be delivered");
        let OutboundFrame::Text(text) = frame else {
            panic!("expected a text frame");
        };
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["type"], "new_leads");
        assert_eq!(json["lead"]["id"], 7);
    }

    #[tokio::test]
    async fn publish_with_empty_registry_still_persists() {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = Arc::new(InMemoryNotificationStore::new());
        let engine = BroadcastEngine::new(registry, store.clone());

        engine.publish(lead_event()).await;

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn persistence_failure_skips_the_broadcast() {
        let registry = Arc::new(ConnectionRegistry::new());
        let engine = BroadcastEngine::new(registry.clone(), Arc::new(FailingStore));

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(ConnectionId::new(), tx).await;

        engine.publish(lead_event()).await;

        // No frame was sent for the failed event.
        assert!(rx.try_recv().is_err());
        // The connection itself is untouched.
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn event_without_notification_skips_the_store() {
        let registry = Arc::new(ConnectionRegistry::new());
        let engine = BroadcastEngine::new(registry.clone(), Arc::new(FailingStore));

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(ConnectionId::new(), tx).await;

        // Pure live-data push: no draft, so the failing store is never hit.
        engine
            .publish(DomainEvent::new(
                Topic::Dashboard,
                EventKind::Update,
                serde_json::json!({"totalLeads": 128}),
            ))
            .await;

        let frame = rx.recv().await.expect("frame should be delivered");
        assert!(matches!(frame, OutboundFrame::Text(_)));
    }

    #[tokio::test]
    async fn subscription_filtering_applies_to_publish() {
        let registry = Arc::new(ConnectionRegistry::new());
        let store = Arc::new(InMemoryNotificationStore::new());
        let engine = BroadcastEngine::new(registry.clone(), store);

        let leads_id = ConnectionId::new();
        let (leads_tx, mut leads_rx) = mpsc::unbounded_channel();
        registry.register(leads_id, leads_tx).await;
        registry.set_subscription(leads_id, Some(Topic::Leads)).await;

        let paiements_id = ConnectionId::new();
        let (paiements_tx, mut paiements_rx) = mpsc::unbounded_channel();
        registry.register(paiements_id, paiements_tx).await;
        registry
            .set_subscription(paiements_id, Some(Topic::Paiements))
            .await;

        engine.publish(lead_event()).await;

        assert!(leads_rx.try_recv().is_ok());
        assert!(paiements_rx.try_recv().is_err());
    }
}
