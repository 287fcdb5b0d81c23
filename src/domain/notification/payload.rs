//! Structured notification payloads.
//!
//! Producers attach one of the typed variants so the compiler checks the
//! shape each domain event carries; `Opaque` keeps the store and wire
//! protocol tolerant of payloads this crate does not know about yet.

use serde::{Deserialize, Serialize};

/// Payload attached to a notification at creation time.
///
/// Serializes untagged: each variant flattens to its inner object, so the
/// stored JSON carries no Rust-side discriminant. The notification `kind`
/// is the discriminant for consumers that care.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NotificationData {
    Lead(LeadSummary),
    Payment(PaymentSummary),
    Demande(DemandeSummary),
    Email(EmailSummary),
    Contact(ContactSummary),
    /// Free-form payload for event types introduced after this build.
    Opaque(serde_json::Value),
}

impl NotificationData {
    /// Converts the payload into a raw JSON value for persistence.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("notification payload serialization should not fail")
    }
}

/// Lead fields the admin UI shows in the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Payment fields the admin UI shows in the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub id: i64,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Service-request (demande) fields for the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandeSummary {
    pub id: i64,
    pub service_type: String,
    pub status: String,
}

/// Inbound email fields for the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSummary {
    pub id: i64,
    pub from: String,
    pub subject: String,
}

/// Contact-form submission fields for the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
