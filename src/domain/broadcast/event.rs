//! Domain events carried to connected admin sessions.

use crate::domain::notification::NotificationDraft;

use super::topic::Topic;

/// Whether the event announces a new record or an update to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    New,
    Update,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::New => "new",
            EventKind::Update => "update",
        }
    }
}

/// A domain event handed to the broadcast engine.
///
/// This is the only way other subsystems (lead creation, payment
/// webhooks, email ingestion) reach connected clients. The optional
/// draft is persisted before any frame is sent; events without one are
/// pure live-data pushes (dashboard refresh, performance figures).
#[derive(Debug, Clone)]
pub struct DomainEvent {
    pub topic: Topic,
    pub kind: EventKind,
    pub payload: serde_json::Value,
    pub notification: Option<NotificationDraft>,
}

impl DomainEvent {
    /// Creates an event without an attached notification.
    pub fn new(topic: Topic, kind: EventKind, payload: serde_json::Value) -> Self {
        Self {
            topic,
            kind,
            payload,
            notification: None,
        }
    }

    /// Attaches a notification draft to persist before broadcasting.
    pub fn with_notification(mut self, draft: NotificationDraft) -> Self {
        self.notification = Some(draft);
        self
    }

    /// Wire `type` field of the broadcast envelope, e.g. `new_leads`.
    pub fn wire_type(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.topic.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{NotificationDraft, NotificationKind};

    #[test]
    fn wire_type_combines_kind_and_topic() {
        let event = DomainEvent::new(Topic::Leads, EventKind::New, serde_json::json!({"id": 7}));
        assert_eq!(event.wire_type(), "new_leads");

        let event = DomainEvent::new(Topic::Paiements, EventKind::Update, serde_json::json!({}));
        assert_eq!(event.wire_type(), "update_paiements");
    }

    #[test]
    fn with_notification_attaches_draft() {
        let event = DomainEvent::new(Topic::Leads, EventKind::New, serde_json::json!({}))
            .with_notification(NotificationDraft::new(
                NotificationKind::Lead,
                "Nouveau lead",
                "Marie Dupont",
            ));
        assert!(event.notification.is_some());
    }
}
