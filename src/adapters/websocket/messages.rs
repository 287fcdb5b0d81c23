//! WebSocket message types for the live notification protocol.
//!
//! Defines the protocol between server and connected admin sessions:
//! - Server → Client: snapshots, domain broadcasts, pongs
//! - Client → Server: pings, subscriptions, read-state commands

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::broadcast::DomainEvent;
use crate::domain::foundation::Timestamp;
use crate::domain::notification::Notification;

// ============================================
// Outbound Frames
// ============================================

/// A frame queued on a connection's outbox.
///
/// The per-connection writer task is the only component that touches the
/// socket sink; everything else enqueues one of these. `Close` tells the
/// writer to shut the transport down - the registry enqueues it when it
/// removes a connection, so removal and transport closure are one step.
#[derive(Debug, Clone)]
pub enum OutboundFrame {
    /// A JSON text frame.
    Text(String),
    /// A WebSocket protocol ping (liveness probe).
    Ping,
    /// Close the transport.
    Close,
}

/// Full-state snapshot frame for the generic notifications stream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub timestamp: String,
}

impl SnapshotMessage {
    /// Builds a snapshot frame stamped with the current time.
    pub fn new(notifications: Vec<Notification>, unread_count: u64) -> Self {
        Self {
            kind: "notifications",
            notifications,
            unread_count,
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }

    /// Serializes the frame to its wire form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("snapshot serialization should not fail")
    }
}

/// Heartbeat response to an application-level `ping` command.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: String,
}

impl PongMessage {
    /// Builds a pong frame stamped with the current time.
    pub fn new() -> Self {
        Self {
            kind: "pong",
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }

    /// Serializes the frame to its wire form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("pong serialization should not fail")
    }
}

impl Default for PongMessage {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the domain broadcast envelope for an event:
/// `{ "type": "new_leads", "lead": {...}, "timestamp": "..." }`.
///
/// The payload key is the singular topic name, so the envelope is
/// assembled by hand rather than through a fixed struct.
pub fn broadcast_envelope(event: &DomainEvent) -> String {
    let mut frame = serde_json::Map::new();
    frame.insert(
        "type".to_string(),
        serde_json::Value::String(event.wire_type()),
    );
    frame.insert(event.topic.singular().to_string(), event.payload.clone());
    frame.insert(
        "timestamp".to_string(),
        serde_json::Value::String(Timestamp::now().to_rfc3339()),
    );
    serde_json::Value::Object(frame).to_string()
}

// ============================================
// Client → Server Commands
// ============================================

/// All control frames a client can send.
///
/// Unknown `type` values and malformed fields fail deserialization; the
/// handler logs and drops such frames without touching the connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    /// Application-level heartbeat; answered with a `pong` frame.
    Ping,

    /// Narrow this connection to a single data stream.
    #[serde(rename_all = "camelCase")]
    Subscribe { data_type: String },

    /// Return to receiving every domain broadcast. The `dataType` some
    /// clients echo back is accepted and ignored.
    #[serde(rename_all = "camelCase")]
    Unsubscribe {
        #[serde(default)]
        #[allow(dead_code)]
        data_type: Option<String>,
    },

    /// Mark one notification read.
    MarkAsRead {
        #[serde(deserialize_with = "numeric_id")]
        id: i64,
    },

    /// Mark every unread notification read.
    MarkAllAsRead,
}

/// Browsers send notification ids both as JSON numbers and as numeric
/// strings; accept either.
fn numeric_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
