//! Application layer - producer-facing services.

mod notifier;

pub use notifier::Notifier;
