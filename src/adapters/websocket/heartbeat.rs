//! Heartbeat monitor - background liveness checks for connections.
//!
//! Runs one ping round per interval (see
//! [`ConnectionRegistry::begin_ping_round`]): connections that answered
//! the previous round's ping stay; connections that stayed silent for a
//! full interval are terminated. The two-round grace tolerates one
//! missed ping while guaranteeing eviction within two intervals of true
//! failure. This round is the subsystem's only timeout mechanism.
//!
//! ## Graceful Shutdown
//!
//! The monitor listens for a shutdown signal and stops before the
//! server closes connections, so no pings are sent into a draining
//! registry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use super::registry::ConnectionRegistry;

/// Background service that pings connections and evicts dead ones.
pub struct HeartbeatMonitor {
    registry: Arc<ConnectionRegistry>,
    interval: Duration,
}

impl HeartbeatMonitor {
    /// Creates a monitor over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Spawns the monitor loop on the runtime.
    pub fn spawn(
        registry: Arc<ConnectionRegistry>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(Self::new(registry, interval).run(shutdown))
    }

    /// Runs ping rounds until the shutdown signal is received.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.interval);
        // The first tick fires immediately; it only pings connections
        // that are already alive, so it is harmless.
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }

                _ = ticker.tick() => {
                    let evicted = self.registry.begin_ping_round().await;
                    if !evicted.is_empty() {
                        let remaining = self.registry.len().await;
                        tracing::info!(
                            evicted = evicted.len(),
                            remaining,
                            "Heartbeat evicted unresponsive connections"
                        );
                    }
                }
            }
        }
        tracing::debug!("Heartbeat monitor stopped");
    }
}
