//! Notification entity and its closed kind enumeration.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, Timestamp};

use super::payload::NotificationData;

/// Category of a notification, matching the admin back-office filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Payment,
    Lead,
    Demand,
    System,
    Contact,
    Email,
    Performance,
    Dashboard,
}

impl NotificationKind {
    /// Stable string form, used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Payment => "payment",
            NotificationKind::Lead => "lead",
            NotificationKind::Demand => "demand",
            NotificationKind::System => "system",
            NotificationKind::Contact => "contact",
            NotificationKind::Email => "email",
            NotificationKind::Performance => "performance",
            NotificationKind::Dashboard => "dashboard",
        }
    }

    /// Parses the stable string form back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "payment" => Some(NotificationKind::Payment),
            "lead" => Some(NotificationKind::Lead),
            "demand" => Some(NotificationKind::Demand),
            "system" => Some(NotificationKind::System),
            "contact" => Some(NotificationKind::Contact),
            "email" => Some(NotificationKind::Email),
            "performance" => Some(NotificationKind::Performance),
            "dashboard" => Some(NotificationKind::Dashboard),
            _ => None,
        }
    }
}

/// A persisted notification row.
///
/// Serializes directly into the wire shape used inside snapshot frames:
/// `{id, type, title, message, time, read, data}`. The `data` payload is
/// attached at creation and immutable thereafter; only `read` ever
/// changes, and only from false to true.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(rename = "time")]
    pub created_at: Timestamp,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Input for creating a notification, before the store assigns identity.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: Option<NotificationData>,
}

impl NotificationDraft {
    /// Creates a draft without a structured payload.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Attaches a structured payload to the draft.
    pub fn with_data(mut self, data: NotificationData) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn fixed_timestamp() -> Timestamp {
        let dt = DateTime::parse_from_rfc3339("2025-03-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Timestamp::from_datetime(dt)
    }

    #[test]
    fn kind_string_forms_roundtrip() {
        for kind in [
            NotificationKind::Payment,
            NotificationKind::Lead,
            NotificationKind::Demand,
            NotificationKind::System,
            NotificationKind::Contact,
            NotificationKind::Email,
            NotificationKind::Performance,
            NotificationKind::Dashboard,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn kind_parse_rejects_unknown() {
        assert_eq!(NotificationKind::parse("telegram"), None);
    }

    #[test]
    fn notification_serializes_to_wire_shape() {
        let notification = Notification {
            id: NotificationId::from_i64(12),
            kind: NotificationKind::Lead,
            title: "Nouveau lead".to_string(),
            message: "Marie Dupont - Lyon".to_string(),
            created_at: fixed_timestamp(),
            read: false,
            data: Some(serde_json::json!({"id": 12})),
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["id"], 12);
        assert_eq!(json["type"], "lead");
        assert_eq!(json["read"], false);
        assert!(json["time"].as_str().unwrap().contains("2025-03-15"));
    }

    #[test]
    fn notification_omits_absent_data() {
        let notification = Notification {
            id: NotificationId::from_i64(1),
            kind: NotificationKind::System,
            title: "Maintenance".to_string(),
            message: "Redémarrage prévu".to_string(),
            created_at: fixed_timestamp(),
            read: true,
            data: None,
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn draft_builder_attaches_data() {
        let draft = NotificationDraft::new(NotificationKind::System, "t", "m")
            .with_data(NotificationData::Opaque(serde_json::json!({"k": 1})));
        assert!(draft.data.is_some());
    }
}
