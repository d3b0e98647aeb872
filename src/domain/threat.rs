// Threat domain model
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::responder::ResponderChannel;
use super::rover::RoverStatus;

/// Half-width of the box, in degrees, that unplaced threats are scattered in
pub const POSITION_JITTER_DEG: f64 = 0.005;
pub const MAX_THREAT_DISTANCE_M: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// High and critical threats are escalated to responders
    pub fn is_escalated(self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub id: Uuid,
    pub severity: Severity,
    pub latitude: f64,
    pub longitude: f64,
    pub distance: f64,
    pub timestamp: DateTime<Utc>,
    pub neutralized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutralized_at: Option<DateTime<Utc>>,
    /// Channels that acknowledged the alert at creation time
    pub alerts_sent: Vec<ResponderChannel>,
}

impl Threat {
    pub fn new(severity: Severity, latitude: f64, longitude: f64, distance: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            latitude,
            longitude,
            distance,
            timestamp: Utc::now(),
            neutralized: false,
            neutralized_at: None,
            alerts_sent: Vec::new(),
        }
    }

    /// Mark as neutralized. Repeated calls move `neutralized_at` forward.
    pub fn neutralize(&mut self, at: DateTime<Utc>) {
        self.neutralized = true;
        self.neutralized_at = Some(at.max(self.timestamp));
    }

    pub fn is_active(&self) -> bool {
        !self.neutralized
    }
}

/// Inbound threat report; missing fields are filled in around the rover
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThreatReport {
    #[serde(default)]
    pub severity: Severity,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance: Option<f64>,
}

impl ThreatReport {
    pub fn into_threat<R: Rng + ?Sized>(self, origin: &RoverStatus, rng: &mut R) -> Threat {
        let jitter = -POSITION_JITTER_DEG..=POSITION_JITTER_DEG;
        let latitude = self
            .latitude
            .unwrap_or_else(|| origin.latitude + rng.gen_range(jitter.clone()));
        let longitude = self
            .longitude
            .unwrap_or_else(|| origin.longitude + rng.gen_range(jitter));
        let distance = self
            .distance
            .unwrap_or_else(|| rng.gen_range(0.0..MAX_THREAT_DISTANCE_M));
        Threat::new(self.severity, latitude, longitude, distance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatSummary {
    pub total: usize,
    pub active: usize,
    pub threats: Vec<Threat>,
}

impl ThreatSummary {
    pub fn new(threats: Vec<Threat>) -> Self {
        Self {
            total: threats.len(),
            active: threats.iter().filter(|t| t.is_active()).count(),
            threats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_only_high_and_critical_escalate() {
        assert!(!Severity::Low.is_escalated());
        assert!(!Severity::Medium.is_escalated());
        assert!(Severity::High.is_escalated());
        assert!(Severity::Critical.is_escalated());
    }

    #[test]
    fn test_new_threat_is_active() {
        let threat = Threat::new(Severity::High, 10.0, 20.0, 50.0);
        assert!(threat.is_active());
        assert!(threat.neutralized_at.is_none());
        assert!(threat.alerts_sent.is_empty());
    }

    #[test]
    fn test_neutralized_at_never_precedes_creation() {
        let mut threat = Threat::new(Severity::Low, 0.0, 0.0, 1.0);
        threat.neutralize(threat.timestamp - Duration::seconds(30));

        assert!(threat.neutralized);
        assert_eq!(threat.neutralized_at, Some(threat.timestamp));
    }

    #[test]
    fn test_wire_format() {
        let threat = Threat::new(Severity::Critical, 10.0, 20.0, 50.0);
        let json = serde_json::to_value(&threat).unwrap();

        assert_eq!(json["severity"], "critical");
        assert_eq!(json["neutralized"], false);
        assert!(json.get("neutralized_at").is_none());
        assert_eq!(json["alerts_sent"], serde_json::json!([]));
    }

    #[test]
    fn test_report_defaults_to_medium_near_rover() {
        let report: ThreatReport = serde_json::from_str("{}").unwrap();
        let origin = RoverStatus::default();
        let mut rng = StdRng::seed_from_u64(7);

        let threat = report.into_threat(&origin, &mut rng);

        assert_eq!(threat.severity, Severity::Medium);
        assert!((threat.latitude - origin.latitude).abs() <= POSITION_JITTER_DEG);
        assert!((threat.longitude - origin.longitude).abs() <= POSITION_JITTER_DEG);
        assert!((0.0..MAX_THREAT_DISTANCE_M).contains(&threat.distance));
    }

    #[test]
    fn test_report_keeps_supplied_fields() {
        let report: ThreatReport = serde_json::from_str(
            r#"{"severity":"critical","latitude":10.0,"longitude":20.0,"distance":50}"#,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let threat = report.into_threat(&RoverStatus::default(), &mut rng);

        assert_eq!(threat.severity, Severity::Critical);
        assert_eq!((threat.latitude, threat.longitude, threat.distance), (10.0, 20.0, 50.0));
    }

    #[test]
    fn test_summary_counts_active() {
        let mut done = Threat::new(Severity::Low, 0.0, 0.0, 0.0);
        done.neutralize(Utc::now());
        let summary = ThreatSummary::new(vec![done, Threat::new(Severity::High, 0.0, 0.0, 0.0)]);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.active, 1);
    }
}
