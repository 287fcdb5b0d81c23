//! Typed producer API over the broadcast engine.
//!
//! The rest of the CRM (lead intake, Stripe webhook handling, email
//! ingestion, dashboard jobs) never builds wire envelopes by hand; it
//! calls one of these producers, which pair the right topic, event
//! kind, payload shape, and notification draft.

use std::sync::Arc;

use crate::adapters::websocket::BroadcastEngine;
use crate::domain::broadcast::{DomainEvent, EventKind, Topic};
use crate::domain::notification::{
    ContactSummary, DemandeSummary, EmailSummary, LeadSummary, NotificationData, NotificationDraft,
    NotificationKind, PaymentSummary,
};

/// Entry point for domain event producers.
#[derive(Clone)]
pub struct Notifier {
    engine: Arc<BroadcastEngine>,
}

impl Notifier {
    /// Creates a notifier over the given engine.
    pub fn new(engine: Arc<BroadcastEngine>) -> Self {
        Self { engine }
    }

    /// A new lead landed from the public request form.
    pub async fn lead_created(&self, lead: LeadSummary) {
        let message = match &lead.city {
            Some(city) => format!("{} - {}", lead.name, city),
            None => lead.name.clone(),
        };
        let data = NotificationData::Lead(lead);

        self.engine
            .publish(
                DomainEvent::new(Topic::Leads, EventKind::New, data.to_value()).with_notification(
                    NotificationDraft::new(NotificationKind::Lead, "Nouveau lead reçu", message)
                        .with_data(data),
                ),
            )
            .await;
    }

    /// An existing lead changed (status, assignment, contact details).
    /// Pure live-data push; the feed already announced the lead.
    pub async fn lead_updated(&self, lead: LeadSummary) {
        let data = NotificationData::Lead(lead);
        self.engine
            .publish(DomainEvent::new(
                Topic::Leads,
                EventKind::Update,
                data.to_value(),
            ))
            .await;
    }

    /// A payment settled (Stripe webhook confirmed the charge).
    pub async fn payment_received(&self, payment: PaymentSummary) {
        let message = format!("{} - {}", format_amount(payment.amount_cents), payment.status);
        let data = NotificationData::Payment(payment);

        self.engine
            .publish(
                DomainEvent::new(Topic::Paiements, EventKind::New, data.to_value())
                    .with_notification(
                        NotificationDraft::new(NotificationKind::Payment, "Paiement reçu", message)
                            .with_data(data),
                    ),
            )
            .await;
    }

    /// A payment changed state (refund, dispute, retry).
    pub async fn payment_updated(&self, payment: PaymentSummary) {
        let message = format!("{} - {}", format_amount(payment.amount_cents), payment.status);
        let data = NotificationData::Payment(payment);

        self.engine
            .publish(
                DomainEvent::new(Topic::Paiements, EventKind::Update, data.to_value())
                    .with_notification(
                        NotificationDraft::new(
                            NotificationKind::Payment,
                            "Paiement mis à jour",
                            message,
                        )
                        .with_data(data),
                    ),
            )
            .await;
    }

    /// A service request (demande) moved through its workflow.
    pub async fn demande_updated(&self, demande: DemandeSummary) {
        let message = format!("{} - {}", demande.service_type, demande.status);
        let data = NotificationData::Demande(demande);

        self.engine
            .publish(
                DomainEvent::new(Topic::Demandes, EventKind::Update, data.to_value())
                    .with_notification(
                        NotificationDraft::new(
                            NotificationKind::Demand,
                            "Demande mise à jour",
                            message,
                        )
                        .with_data(data),
                    ),
            )
            .await;
    }

    /// An email arrived in the shared inbox.
    pub async fn email_received(&self, email: EmailSummary) {
        let message = format!("{} : {}", email.from, email.subject);
        let data = NotificationData::Email(email);

        self.engine
            .publish(
                DomainEvent::new(Topic::Emails, EventKind::New, data.to_value())
                    .with_notification(
                        NotificationDraft::new(NotificationKind::Email, "Nouvel email", message)
                            .with_data(data),
                    ),
            )
            .await;
    }

    /// A contact-form submission came in from the marketing pages.
    pub async fn contact_received(&self, contact: ContactSummary) {
        let data = NotificationData::Contact(contact.clone());

        self.engine
            .publish(
                DomainEvent::new(Topic::Contacts, EventKind::New, data.to_value())
                    .with_notification(
                        NotificationDraft::new(
                            NotificationKind::Contact,
                            "Nouveau message de contact",
                            contact.name,
                        )
                        .with_data(data),
                    ),
            )
            .await;
    }

    /// Recomputed dashboard metrics. Live push only; the dashboard is
    /// not worth a persistent notification per refresh.
    pub async fn dashboard_refreshed(&self, metrics: serde_json::Value) {
        self.engine
            .publish(DomainEvent::new(
                Topic::Dashboard,
                EventKind::Update,
                metrics,
            ))
            .await;
    }

    /// Periodic performance figures for the admin performance page.
    pub async fn performance_report(&self, report: serde_json::Value) {
        self.engine
            .publish(DomainEvent::new(
                Topic::Performance,
                EventKind::Update,
                report,
            ))
            .await;
    }

    /// Operator-facing system notice (maintenance, degraded service).
    pub async fn system_notice(&self, title: impl Into<String>, message: impl Into<String>) {
        let title = title.into();
        let message = message.into();
        let payload = serde_json::json!({"title": title, "message": message});

        self.engine
            .publish(
                DomainEvent::new(Topic::Notifications, EventKind::New, payload).with_notification(
                    NotificationDraft::new(NotificationKind::System, title, message),
                ),
            )
            .await;
    }
}

/// Renders an amount in cents as the admin UI shows it, e.g. `129,90 €`.
fn format_amount(amount_cents: i64) -> String {
    format!("{},{:02} €", amount_cents / 100, (amount_cents % 100).abs())
}
