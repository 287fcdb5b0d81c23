//! WebSocket subsystem configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// WebSocket configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    /// Seconds between heartbeat ping rounds. A connection that stays
    /// silent for two full rounds is evicted; design target is 30-60s.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Number of notifications carried in each snapshot frame. The
    /// unread count always covers the whole store regardless.
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: u32,
}

impl WebSocketConfig {
    /// Get heartbeat interval as Duration
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    /// Validate WebSocket configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.heartbeat_interval_secs < 5 || self.heartbeat_interval_secs > 600 {
            return Err(ValidationError::InvalidHeartbeatInterval);
        }
        if self.snapshot_limit == 0 || self.snapshot_limit > 500 {
            return Err(ValidationError::InvalidSnapshotLimit);
        }
        Ok(())
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval(),
            snapshot_limit: default_snapshot_limit(),
        }
    }
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_snapshot_limit() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_config_defaults() {
        let config = WebSocketConfig::default();
        assert_eq!(config.heartbeat_interval_secs, 30);
        assert_eq!(config.snapshot_limit, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_heartbeat_interval_duration() {
        let config = WebSocketConfig {
            heartbeat_interval_secs: 45,
            ..Default::default()
        };
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(45));
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let config = WebSocketConfig {
            heartbeat_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_snapshot_limit() {
        let config = WebSocketConfig {
            snapshot_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
