//! Foundation value objects shared across the domain.

mod ids;
mod timestamp;

pub use ids::{ConnectionId, NotificationId};
pub use timestamp::Timestamp;
