//! WebSocket adapters for the live admin notification feed.
//!
//! This module is the real-time core of the service: it owns the set of
//! open connections, watches their liveness, and fans domain events and
//! notification snapshots out to the browsers that care.
//!
//! # Architecture
//!
//! ```text
//! Domain producers (leads, paiements, emails, ...)
//!           │ publish(DomainEvent)
//!           ▼
//! ┌────────────────────┐     persist first      ┌───────────────────┐
//! │  BroadcastEngine   │ ─────────────────────▶ │ NotificationStore │
//! └────────────────────┘                        └───────────────────┘
//!           │ fan_out(topic, frame)
//!           ▼
//! ┌────────────────────┐   outbox per conn   ┌──────────────────────┐
//! │ ConnectionRegistry │ ──────────────────▶ │ writer task → socket │
//! └────────────────────┘                     └──────────────────────┘
//!           ▲                                          ▲
//!           │ ping rounds                              │ snapshots
//! ┌────────────────────┐                     ┌──────────────────────┐
//! │  HeartbeatMonitor  │                     │    SnapshotSender    │
//! └────────────────────┘                     └──────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - wire protocol types and envelope builders
//! - [`registry`] - connection registry (the single shared mutable set)
//! - [`heartbeat`] - ping rounds and eviction of dead connections
//! - [`broadcast`] - domain event fan-out
//! - [`snapshot`] - full-state delivery for the notifications stream
//! - [`handler`] - axum upgrade handler and inbound command dispatch

pub mod broadcast;
pub mod handler;
pub mod heartbeat;
pub mod messages;
pub mod registry;
pub mod snapshot;

pub use broadcast::BroadcastEngine;
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use heartbeat::HeartbeatMonitor;
pub use messages::{broadcast_envelope, ClientCommand, OutboundFrame, PongMessage, SnapshotMessage};
pub use registry::{ConnectionEntry, ConnectionRegistry, FanOutReport};
pub use snapshot::{SnapshotSender, DEFAULT_SNAPSHOT_LIMIT};
