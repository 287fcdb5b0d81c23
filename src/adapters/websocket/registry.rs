//! Connection registry: the single owner of live WebSocket connections.
//!
//! Every mutation (register, unregister, subscribe) and every iteration
//! goes through this component; the underlying map is never exposed.
//! Sends are non-blocking enqueues onto per-connection outboxes, so the
//! read guard is never held across an await point.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};

use crate::domain::broadcast::Topic;
use crate::domain::foundation::ConnectionId;

use super::messages::OutboundFrame;

/// Per-round liveness state.
///
/// `Alive -> (ping sent) -> AwaitingPong -> (pong received) -> Alive`.
/// A connection still `AwaitingPong` when the next round begins has
/// missed a full interval and is evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Alive,
    AwaitingPong,
}

/// A registered connection: its outbox plus routing state.
pub struct ConnectionEntry {
    id: ConnectionId,
    outbox: mpsc::UnboundedSender<OutboundFrame>,
    liveness: Liveness,
    topic: Option<Topic>,
}

impl ConnectionEntry {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueues a frame on this connection's outbox. Returns false when
    /// the writer task is gone, which callers treat as a death signal.
    pub fn send(&self, frame: OutboundFrame) -> bool {
        self.outbox.send(frame).is_ok()
    }

    fn matches(&self, topic: Topic) -> bool {
        match self.topic {
            None => true,
            Some(subscribed) => subscribed == topic,
        }
    }
}

/// Outcome of a fan-out pass, for logging.
#[derive(Debug, Default)]
pub struct FanOutReport {
    pub delivered: usize,
    pub evicted: Vec<ConnectionId>,
}

/// Tracks open connections and their subscription state.
///
/// Removal and transport closure are one step: `unregister` enqueues a
/// `Close` frame (stopping the writer task) before dropping the entry,
/// so a connection present in the registry always has a live transport.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a connection into the live set. Idempotent: registering
    /// an id that is already present keeps the existing entry and
    /// returns false.
    pub async fn register(
        &self,
        id: ConnectionId,
        outbox: mpsc::UnboundedSender<OutboundFrame>,
    ) -> bool {
        let mut connections = self.connections.write().await;
        if connections.contains_key(&id) {
            return false;
        }

        connections.insert(
            id,
            ConnectionEntry {
                id,
                outbox,
                liveness: Liveness::Alive,
                topic: None,
            },
        );
        true
    }

    /// Removes a connection and closes its transport. Safe to call any
    /// number of times; returns whether anything was removed.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(&id);
        match removed {
            Some(entry) => {
                // Stop the writer task; the entry (and its sender) drop here.
                let _ = entry.send(OutboundFrame::Close);
                true
            }
            None => false,
        }
    }

    /// Overwrites the connection's subscription. `None` restores
    /// receive-everything behavior. Returns false for unknown ids.
    pub async fn set_subscription(&self, id: ConnectionId, topic: Option<Topic>) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get_mut(&id) {
            Some(entry) => {
                entry.topic = topic;
                true
            }
            None => false,
        }
    }

    /// Returns the connection's current subscription, or `None` if the
    /// connection is not registered. For diagnostics and tests.
    pub async fn subscription(&self, id: ConnectionId) -> Option<Option<Topic>> {
        self.connections.read().await.get(&id).map(|e| e.topic)
    }

    /// Invokes `f` for every connection whose subscription is absent or
    /// equals `topic`. `f` must not block; sends are enqueues.
    pub async fn for_each_matching(&self, topic: Topic, mut f: impl FnMut(&ConnectionEntry)) {
        let connections = self.connections.read().await;
        for entry in connections.values().filter(|e| e.matches(topic)) {
            f(entry);
        }
    }

    /// Delivers a frame to every matching connection, evicting the ones
    /// whose transport is gone. Per-connection failures never abort
    /// delivery to the rest.
    pub async fn fan_out(&self, topic: Topic, frame: &OutboundFrame) -> FanOutReport {
        let mut report = FanOutReport::default();
        self.for_each_matching(topic, |entry| {
            if entry.send(frame.clone()) {
                report.delivered += 1;
            } else {
                report.evicted.push(entry.id());
            }
        })
        .await;

        for id in &report.evicted {
            self.unregister(*id).await;
            tracing::debug!(connection_id = %id, "Evicted connection with closed transport");
        }
        report
    }

    /// Flips a connection back to alive after a pong. Returns false for
    /// unknown ids (a pong can race its own eviction; that is benign).
    pub async fn mark_alive(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get_mut(&id) {
            Some(entry) => {
                entry.liveness = Liveness::Alive;
                true
            }
            None => false,
        }
    }

    /// Runs one heartbeat round: evicts every connection that failed to
    /// answer the previous round's ping, then marks the survivors
    /// awaiting-pong and pings them. A failed ping enqueue evicts
    /// immediately rather than waiting for the next round.
    ///
    /// Returns the evicted ids.
    pub async fn begin_ping_round(&self) -> Vec<ConnectionId> {
        let mut evicted = Vec::new();
        let mut connections = self.connections.write().await;

        connections.retain(|id, entry| {
            if entry.liveness == Liveness::AwaitingPong {
                let _ = entry.send(OutboundFrame::Close);
                evicted.push(*id);
                false
            } else {
                true
            }
        });

        connections.retain(|id, entry| {
            entry.liveness = Liveness::AwaitingPong;
            if entry.send(OutboundFrame::Ping) {
                true
            } else {
                evicted.push(*id);
                false
            }
        });

        evicted
    }

    /// Closes every connection. Used on graceful shutdown, after the
    /// heartbeat monitor has stopped. Returns how many were closed.
    pub async fn close_all(&self) -> usize {
        let mut connections = self.connections.write().await;
        let count = connections.len();
        for entry in connections.values() {
            let _ = entry.send(OutboundFrame::Close);
        }
        connections.clear();
        count
    }

    /// Number of live connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// True when no connections are registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Membership check, for tests and diagnostics.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
