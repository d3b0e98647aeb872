// Rover telemetry domain model
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalState {
    Active,
    Idle,
    Charging,
    Maintenance,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaserStatus {
    Ready,
    Charging,
    Firing,
    Offline,
}

/// Live state of the field unit. Handed out as a snapshot copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverStatus {
    pub status: OperationalState,
    pub battery: f64,
    pub laser_status: LaserStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub cpu_usage: f64,
    pub ram_usage: f64,
    /// Cumulative odometry in meters
    pub distance_traveled: f64,
}

impl Default for RoverStatus {
    fn default() -> Self {
        Self {
            status: OperationalState::Active,
            battery: 85.0,
            laser_status: LaserStatus::Ready,
            latitude: 13.0827,
            longitude: 80.2707,
            temperature: 45.0,
            cpu_usage: 42.0,
            ram_usage: 68.0,
            distance_traveled: 0.0,
        }
    }
}

impl RoverStatus {
    /// Overwrite only the fields present in the patch
    pub fn apply(&mut self, patch: &RoverStatusPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(battery) = patch.battery {
            self.battery = battery;
        }
        if let Some(laser_status) = patch.laser_status {
            self.laser_status = laser_status;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(temperature) = patch.temperature {
            self.temperature = temperature;
        }
        if let Some(cpu_usage) = patch.cpu_usage {
            self.cpu_usage = cpu_usage;
        }
        if let Some(ram_usage) = patch.ram_usage {
            self.ram_usage = ram_usage;
        }
        if let Some(distance_traveled) = patch.distance_traveled {
            self.distance_traveled = distance_traveled;
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("{field} must be within [0, 100], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("distance_traveled must be non-negative, got {0}")]
    NegativeDistance(f64),
}

/// Partial status update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoverStatusPatch {
    pub status: Option<OperationalState>,
    pub battery: Option<f64>,
    pub laser_status: Option<LaserStatus>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temperature: Option<f64>,
    pub cpu_usage: Option<f64>,
    pub ram_usage: Option<f64>,
    pub distance_traveled: Option<f64>,
}

impl RoverStatusPatch {
    pub fn validate(&self) -> Result<(), PatchError> {
        let percentages = [
            ("battery", self.battery),
            ("cpu_usage", self.cpu_usage),
            ("ram_usage", self.ram_usage),
        ];
        for (field, value) in percentages {
            if let Some(value) = value {
                if !(0.0..=100.0).contains(&value) {
                    return Err(PatchError::OutOfRange { field, value });
                }
            }
        }
        match self.distance_traveled {
            Some(d) if d < 0.0 => Err(PatchError::NegativeDistance(d)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut status = RoverStatus::default();
        let patch = RoverStatusPatch {
            battery: Some(50.0),
            laser_status: Some(LaserStatus::Charging),
            ..Default::default()
        };

        status.apply(&patch);

        assert_eq!(status.battery, 50.0);
        assert_eq!(status.laser_status, LaserStatus::Charging);
        assert_eq!(status.status, OperationalState::Active);
        assert_eq!(status.latitude, 13.0827);
        assert_eq!(status.cpu_usage, 42.0);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut status = RoverStatus::default();
        status.apply(&RoverStatusPatch::default());
        assert_eq!(status, RoverStatus::default());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let patch = RoverStatusPatch {
            battery: Some(120.0),
            ..Default::default()
        };
        assert_eq!(
            patch.validate(),
            Err(PatchError::OutOfRange {
                field: "battery",
                value: 120.0
            })
        );

        let patch = RoverStatusPatch {
            distance_traveled: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(patch.validate(), Err(PatchError::NegativeDistance(-1.0)));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_value(RoverStatus::default()).unwrap();
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["laser_status"], "READY");

        let patch: RoverStatusPatch =
            serde_json::from_str(r#"{"status":"CHARGING","battery":12.5}"#).unwrap();
        assert_eq!(patch.status, Some(OperationalState::Charging));
        assert_eq!(patch.battery, Some(12.5));
        assert_eq!(patch.latitude, None);
    }
}
