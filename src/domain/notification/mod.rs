//! Notification entity, kinds, and structured payloads.

mod payload;
mod record;

pub use payload::{
    ContactSummary, DemandeSummary, EmailSummary, LeadSummary, NotificationData, PaymentSummary,
};
pub use record::{Notification, NotificationDraft, NotificationKind};
