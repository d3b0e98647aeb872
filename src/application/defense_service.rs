// Defense service - Use cases tying the store, escalation, dispatch and broadcast together
use crate::application::broadcast_hub::{BroadcastHub, DeliveryError};
use crate::application::dispatcher::Dispatcher;
use crate::application::error::CoreError;
use crate::application::escalation::should_escalate;
use crate::application::rover_store::RoverStore;
use crate::domain::alert::{Alert, AlertLocation, AlertRequest};
use crate::domain::event::{LaserResult, NeutralizedThreat, RoverEvent};
use crate::domain::responder::Incident;
use crate::domain::rover::{RoverStatus, RoverStatusPatch};
use crate::domain::threat::{Threat, ThreatReport, ThreatSummary};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct DefenseService {
    store: Arc<RoverStore>,
    dispatcher: Dispatcher,
    hub: BroadcastHub,
}

impl DefenseService {
    pub fn new(store: Arc<RoverStore>, dispatcher: Dispatcher, hub: BroadcastHub) -> Self {
        Self {
            store,
            dispatcher,
            hub,
        }
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    pub fn status(&self) -> RoverStatus {
        self.store.get_status()
    }

    pub fn update_status(&self, patch: &RoverStatusPatch) -> RoverStatus {
        self.hub.commit(
            |store| store.merge_status(patch),
            |status| Some(RoverEvent::RoverStatus(status.clone())),
        )
    }

    /// Atomically mutate the status and broadcast the result
    pub fn mutate_status<F>(&self, f: F) -> RoverStatus
    where
        F: FnOnce(&mut RoverStatus),
    {
        self.hub.commit(
            |store| store.update_status(f),
            |status| Some(RoverEvent::RoverStatus(status.clone())),
        )
    }

    pub async fn report_threat(&self, report: ThreatReport) -> Threat {
        let origin = self.store.get_status();
        let threat = {
            let mut rng = rand::thread_rng();
            report.into_threat(&origin, &mut rng)
        };
        self.commit_threat(threat).await
    }

    /// Escalate if the severity warrants it, then store and announce.
    /// Observers never see a threat whose dispatch is still pending.
    pub async fn commit_threat(&self, mut threat: Threat) -> Threat {
        if should_escalate(&threat) {
            threat.alerts_sent = self.dispatcher.dispatch(Incident::Threat(&threat)).await;
        }

        let threat = self.hub.commit(
            |store| store.add_threat(threat),
            |threat| Some(RoverEvent::ThreatDetected(threat.clone())),
        );
        tracing::info!(
            threat_id = %threat.id,
            severity = %threat.severity,
            alerts_sent = ?threat.alerts_sent,
            "Threat recorded"
        );
        threat
    }

    pub fn find_threat(&self, id: Uuid) -> Result<Threat, CoreError> {
        self.store.find_threat(id).ok_or(CoreError::ThreatNotFound(id))
    }

    pub fn neutralize_threat(&self, id: Uuid) -> Result<Threat, CoreError> {
        let threat = self.hub.commit(
            |store| store.neutralize(id),
            |outcome| {
                outcome
                    .is_ok()
                    .then_some(RoverEvent::ThreatNeutralized(NeutralizedThreat { id }))
            },
        )?;
        tracing::info!(threat_id = %id, "Threat neutralized");
        Ok(threat)
    }

    pub fn threat_summary(&self) -> ThreatSummary {
        ThreatSummary::new(self.store.get_threats())
    }

    /// Manual alerts are dispatched and stored but not broadcast
    pub async fn dispatch_alert(&self, request: AlertRequest) -> Alert {
        let origin = self.store.get_status();
        let mut alert = request.into_alert(AlertLocation {
            latitude: origin.latitude,
            longitude: origin.longitude,
        });
        alert.dispatched_to = self.dispatcher.dispatch(Incident::Alert(&alert)).await;

        let alert = self.store.add_alert(alert);
        tracing::info!(
            alert_id = %alert.id,
            kind = %alert.kind,
            dispatched_to = ?alert.dispatched_to,
            "Alert dispatched"
        );
        alert
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.store.get_alerts()
    }

    /// Simulated laser shot, acknowledged to the requesting observer only
    pub fn fire_laser(
        &self,
        observer: Uuid,
        target: serde_json::Value,
    ) -> Result<LaserResult, DeliveryError> {
        tracing::info!(observer = %observer, target = %target, "Laser fired at target");
        let result = LaserResult::acknowledge(target);
        self.hub
            .send_to(observer, RoverEvent::LaserResult(result.clone()))?;
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::broadcast_hub::{ObserverConnection, ObserverSink};
    use crate::application::dispatcher::tests::ScriptedGateway;
    use crate::domain::responder::ResponderChannel::*;
    use crate::domain::threat::Severity;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;

    pub(crate) fn service() -> DefenseService {
        service_with(Arc::new(ScriptedGateway::default()))
    }

    pub(crate) fn service_with(gateway: Arc<ScriptedGateway>) -> DefenseService {
        let store = Arc::new(RoverStore::default());
        let dispatcher = Dispatcher::new(gateway, Duration::from_millis(200));
        let hub = BroadcastHub::new(store.clone(), 10);
        DefenseService::new(store, dispatcher, hub)
    }

    /// Connect an observer and skip its greeting
    pub(crate) async fn observe(service: &DefenseService) -> (Uuid, mpsc::Receiver<RoverEvent>) {
        let (connection, mut rx) = ObserverConnection::new(16);
        let id = connection.id();
        service.hub().on_connect(Arc::new(connection));
        rx.recv().await;
        rx.recv().await;
        (id, rx)
    }

    fn critical_report() -> ThreatReport {
        ThreatReport {
            severity: Severity::Critical,
            latitude: Some(10.0),
            longitude: Some(20.0),
            distance: Some(50.0),
        }
    }

    #[tokio::test]
    async fn test_critical_threat_alerts_all_and_broadcasts_once() {
        let service = service();
        let (_, mut first) = observe(&service).await;
        let (_, mut second) = observe(&service).await;

        let threat = service.report_threat(critical_report()).await;

        assert_eq!(threat.alerts_sent, vec![Police, Fire, Medical]);
        assert_eq!((threat.latitude, threat.longitude, threat.distance), (10.0, 20.0, 50.0));
        for rx in [&mut first, &mut second] {
            assert_eq!(rx.recv().await, Some(RoverEvent::ThreatDetected(threat.clone())));
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn test_low_threat_is_not_escalated_but_broadcast() {
        let gateway = Arc::new(ScriptedGateway::default());
        let service = service_with(gateway.clone());
        let (_, mut rx) = observe(&service).await;

        let threat = service
            .report_threat(ThreatReport {
                severity: Severity::Low,
                ..Default::default()
            })
            .await;

        assert!(threat.alerts_sent.is_empty());
        assert!(gateway.calls.lock().is_empty());
        assert_eq!(rx.recv().await, Some(RoverEvent::ThreatDetected(threat)));
    }

    #[tokio::test]
    async fn test_listed_threat_already_has_alerts() {
        let service = service();
        let threat = service.report_threat(critical_report()).await;

        let summary = service.threat_summary();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.active, 1);
        assert_eq!(summary.threats[0].alerts_sent, threat.alerts_sent);
    }

    #[tokio::test]
    async fn test_channel_failure_does_not_fail_report() {
        let gateway = Arc::new(ScriptedGateway {
            failing: vec![Fire],
            ..Default::default()
        });
        let service = service_with(gateway);

        let threat = service.report_threat(critical_report()).await;

        assert_eq!(threat.alerts_sent, vec![Police, Medical]);
    }

    #[tokio::test]
    async fn test_neutralize_broadcasts_id() {
        let service = service();
        let threat = service.report_threat(critical_report()).await;
        let (_, mut rx) = observe(&service).await;

        let neutralized = service.neutralize_threat(threat.id).unwrap();

        assert!(neutralized.neutralized);
        assert_eq!(neutralized.alerts_sent, threat.alerts_sent);
        assert_eq!(
            rx.recv().await,
            Some(RoverEvent::ThreatNeutralized(NeutralizedThreat { id: threat.id }))
        );
        assert_eq!(service.threat_summary().active, 0);
    }

    #[tokio::test]
    async fn test_find_threat() {
        let service = service();
        let threat = service.report_threat(critical_report()).await;

        assert_eq!(service.find_threat(threat.id).unwrap(), threat);
        assert!(matches!(
            service.find_threat(Uuid::new_v4()),
            Err(CoreError::ThreatNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_neutralize_unknown_is_not_broadcast() {
        let service = service();
        let (_, mut rx) = observe(&service).await;

        let result = service.neutralize_threat(Uuid::new_v4());

        assert!(matches!(result, Err(CoreError::ThreatNotFound(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_status_broadcasts_snapshot() {
        let service = service();
        let (_, mut rx) = observe(&service).await;

        let status = service.update_status(&RoverStatusPatch {
            cpu_usage: Some(99.0),
            ..Default::default()
        });

        assert_eq!(status.cpu_usage, 99.0);
        assert_eq!(rx.recv().await, Some(RoverEvent::RoverStatus(status)));
    }

    #[tokio::test]
    async fn test_alert_uses_rover_location_and_is_not_broadcast() {
        let service = service();
        let (_, mut rx) = observe(&service).await;

        let alert = service.dispatch_alert(AlertRequest::default()).await;

        let status = service.status();
        assert_eq!(alert.location.latitude, status.latitude);
        assert_eq!(alert.location.longitude, status.longitude);
        assert_eq!(alert.dispatched_to, vec![Police, Medical]);
        assert_eq!(service.alerts(), vec![alert]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fire_laser_answers_requester_only() {
        let service = service();
        let (shooter, mut shooter_rx) = observe(&service).await;
        let (_, mut bystander_rx) = observe(&service).await;

        let result = service.fire_laser(shooter, json!({ "track": 7 })).unwrap();

        assert!(result.success);
        assert_eq!(shooter_rx.recv().await, Some(RoverEvent::LaserResult(result)));
        assert!(bystander_rx.try_recv().is_err());
    }
}
