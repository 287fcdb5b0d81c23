//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the broadcast core and the outside world. Adapters implement these
//! ports.
//!
//! - `NotificationStore` - persistence for notification records

mod notification_store;

pub use notification_store::{NotificationStore, NotificationStoreError};
