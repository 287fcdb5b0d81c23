//! Adapters - Implementations of ports and transport-facing components.
//!
//! - `memory` - in-memory notification store for tests
//! - `postgres` - PostgreSQL notification store
//! - `websocket` - connection registry, heartbeat, broadcast, snapshots

pub mod memory;
pub mod postgres;
pub mod websocket;

pub use memory::InMemoryNotificationStore;
pub use postgres::PostgresNotificationStore;
pub use websocket::{
    BroadcastEngine, ConnectionRegistry, HeartbeatMonitor, SnapshotSender, WebSocketState,
};
