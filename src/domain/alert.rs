// Manual alert domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::responder::ResponderChannel;

pub const DEFAULT_ALERT_TYPE: &str = "emergency";
pub const DEFAULT_ALERT_MESSAGE: &str = "Hostile drone detected";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Operator-initiated dispatch record. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: AlertLocation,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub dispatched_to: Vec<ResponderChannel>,
}

impl Alert {
    pub fn new(kind: String, location: AlertLocation, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            location,
            message,
            timestamp: Utc::now(),
            dispatched_to: Vec::new(),
        }
    }
}

/// Inbound manual dispatch request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlertRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub location: Option<AlertLocation>,
    pub message: Option<String>,
}

impl AlertRequest {
    pub fn into_alert(self, fallback: AlertLocation) -> Alert {
        Alert::new(
            self.kind.unwrap_or_else(|| DEFAULT_ALERT_TYPE.to_string()),
            self.location.unwrap_or(fallback),
            self.message.unwrap_or_else(|| DEFAULT_ALERT_MESSAGE.to_string()),
        )
    }
}
