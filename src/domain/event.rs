// Observer event catalog
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rover::RoverStatus;
use super::threat::Threat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutralizedThreat {
    pub id: Uuid,
}

/// Simulated acknowledgment for a manual laser shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserResult {
    pub success: bool,
    pub target: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl LaserResult {
    pub fn acknowledge(target: serde_json::Value) -> Self {
        Self {
            success: true,
            target,
            timestamp: Utc::now(),
        }
    }
}

/// Server-to-observer event. On the wire: `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RoverEvent {
    RoverStatus(RoverStatus),
    ThreatDetected(Threat),
    ThreatNeutralized(NeutralizedThreat),
    RecentThreats(Vec<Threat>),
    LaserResult(LaserResult),
}

impl RoverEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RoverEvent::RoverStatus(_) => "rover_status",
            RoverEvent::ThreatDetected(_) => "threat_detected",
            RoverEvent::ThreatNeutralized(_) => "threat_neutralized",
            RoverEvent::RecentThreats(_) => "recent_threats",
            RoverEvent::LaserResult(_) => "laser_result",
        }
    }
}

/// Observer-to-server message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    FireLaser(serde_json::Value),
}
