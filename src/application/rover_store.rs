// Rover store - Authoritative in-memory state for status, threats and alerts
use crate::application::error::CoreError;
use crate::domain::alert::Alert;
use crate::domain::rover::{RoverStatus, RoverStatusPatch};
use crate::domain::threat::Threat;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

/// Each record/collection sits behind its own lock; no lock is held across
/// dispatch or broadcast.
#[derive(Debug)]
pub struct RoverStore {
    status: RwLock<RoverStatus>,
    threats: RwLock<Vec<Threat>>,
    alerts: RwLock<Vec<Alert>>,
}

impl RoverStore {
    pub fn new(initial: RoverStatus) -> Self {
        Self {
            status: RwLock::new(initial),
            threats: RwLock::new(Vec::new()),
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub fn get_status(&self) -> RoverStatus {
        self.status.read().clone()
    }

    pub fn merge_status(&self, patch: &RoverStatusPatch) -> RoverStatus {
        self.update_status(|status| status.apply(patch))
    }

    /// Read-modify-write of the status under a single write lock
    pub fn update_status<F>(&self, f: F) -> RoverStatus
    where
        F: FnOnce(&mut RoverStatus),
    {
        let mut status = self.status.write();
        f(&mut status);
        status.clone()
    }

    pub fn add_threat(&self, threat: Threat) -> Threat {
        self.threats.write().push(threat.clone());
        threat
    }

    pub fn get_threats(&self) -> Vec<Threat> {
        self.threats.read().clone()
    }

    /// The last `n` threats, oldest first
    pub fn recent_threats(&self, n: usize) -> Vec<Threat> {
        let threats = self.threats.read();
        let start = threats.len().saturating_sub(n);
        threats[start..].to_vec()
    }

    pub fn find_threat(&self, id: Uuid) -> Option<Threat> {
        self.threats.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn neutralize(&self, id: Uuid) -> Result<Threat, CoreError> {
        let mut threats = self.threats.write();
        let threat = threats
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::ThreatNotFound(id))?;
        threat.neutralize(Utc::now());
        Ok(threat.clone())
    }

    pub fn add_alert(&self, alert: Alert) -> Alert {
        self.alerts.write().push(alert.clone());
        alert
    }

    pub fn get_alerts(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }
}

impl Default for RoverStore {
    fn default() -> Self {
        Self::new(RoverStatus::default())
    }
}
