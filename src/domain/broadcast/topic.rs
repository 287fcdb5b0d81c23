//! Broadcast topics and their wire vocabulary.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a client subscribes to a topic this server does
/// not publish.
#[derive(Debug, Clone, Error)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

/// A data stream a connection can subscribe to.
///
/// A connection with no topic receives every domain broadcast; a
/// connection with a topic receives only frames for that topic.
/// `Notifications` is the generic stream snapshot frames are addressed
/// to, so snapshot delivery uses the same matching rule as domain
/// broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Contacts,
    Leads,
    Demandes,
    Paiements,
    Emails,
    Performance,
    Dashboard,
    Notifications,
}

impl Topic {
    /// Plural wire form, as used in `subscribe` frames and event types.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Contacts => "contacts",
            Topic::Leads => "leads",
            Topic::Demandes => "demandes",
            Topic::Paiements => "paiements",
            Topic::Emails => "emails",
            Topic::Performance => "performance",
            Topic::Dashboard => "dashboard",
            Topic::Notifications => "notifications",
        }
    }

    /// Singular form, used as the payload key in broadcast envelopes.
    pub fn singular(&self) -> &'static str {
        match self {
            Topic::Contacts => "contact",
            Topic::Leads => "lead",
            Topic::Demandes => "demande",
            Topic::Paiements => "paiement",
            Topic::Emails => "email",
            Topic::Performance => "performance",
            Topic::Dashboard => "dashboard",
            Topic::Notifications => "notification",
        }
    }

    /// All topics, for exhaustive tests and documentation.
    pub const ALL: [Topic; 8] = [
        Topic::Contacts,
        Topic::Leads,
        Topic::Demandes,
        Topic::Paiements,
        Topic::Emails,
        Topic::Performance,
        Topic::Dashboard,
        Topic::Notifications,
    ];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contacts" => Ok(Topic::Contacts),
            "leads" => Ok(Topic::Leads),
            "demandes" => Ok(Topic::Demandes),
            "paiements" => Ok(Topic::Paiements),
            "emails" => Ok(Topic::Emails),
            "performance" => Ok(Topic::Performance),
            "dashboard" => Ok(Topic::Dashboard),
            "notifications" => Ok(Topic::Notifications),
            other => Err(UnknownTopic(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_forms_roundtrip_for_every_topic() {
        for topic in Topic::ALL {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let err = "factures".parse::<Topic>().unwrap_err();
        assert_eq!(err.to_string(), "unknown topic: factures");
    }

    #[test]
    fn singular_forms_match_protocol() {
        assert_eq!(Topic::Leads.singular(), "lead");
        assert_eq!(Topic::Demandes.singular(), "demande");
        assert_eq!(Topic::Paiements.singular(), "paiement");
        // Invariant topics keep their plural-free name.
        assert_eq!(Topic::Performance.singular(), "performance");
        assert_eq!(Topic::Dashboard.singular(), "dashboard");
    }
}
