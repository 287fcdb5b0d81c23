//! PostgreSQL adapters.

mod notification_store;

pub use notification_store::PostgresNotificationStore;
