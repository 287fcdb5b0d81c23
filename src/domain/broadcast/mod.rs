//! Broadcast vocabulary: topics, event kinds, and domain events.

mod event;
mod topic;

pub use event::{DomainEvent, EventKind};
pub use topic::{Topic, UnknownTopic};
