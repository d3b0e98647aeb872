// Responder channel domain model
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::alert::Alert;
use super::threat::{Severity, Threat};

/// External emergency service that can be notified about a threat or alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponderChannel {
    Police,
    Fire,
    Medical,
}

impl ResponderChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponderChannel::Police => "Police",
            ResponderChannel::Fire => "Fire",
            ResponderChannel::Medical => "Medical",
        }
    }
}

impl fmt::Display for ResponderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something responders can be notified about
#[derive(Debug, Clone, Copy)]
pub enum Incident<'a> {
    Threat(&'a Threat),
    Alert(&'a Alert),
}

impl Incident<'_> {
    pub fn id(&self) -> Uuid {
        match self {
            Incident::Threat(t) => t.id,
            Incident::Alert(a) => a.id,
        }
    }

    /// Manual alerts carry no severity
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Incident::Threat(t) => Some(t.severity),
            Incident::Alert(_) => None,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        match self {
            Incident::Threat(t) => (t.latitude, t.longitude),
            Incident::Alert(a) => (a.location.latitude, a.location.longitude),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Incident::Threat(t) => format!("Hostile drone detected - {} threat level", t.severity),
            Incident::Alert(a) => a.message.clone(),
        }
    }
}
