// Simulation drivers - Periodic telemetry drift and synthetic threat injection
use crate::application::defense_service::DefenseService;
use crate::domain::rover::RoverStatus;
use crate::domain::threat::{Severity, Threat, ThreatReport};
use crate::infrastructure::config::SimulationSettings;
use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::Range;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

const CPU_BAND: Range<f64> = 35.0..55.0;
const RAM_BAND: Range<f64> = 60.0..75.0;
const TEMPERATURE_BAND: Range<f64> = 40.0..50.0;
/// Meters covered per telemetry tick, at most
const MAX_STEP_M: f64 = 2.0;
const POSITION_DRIFT_DEG: f64 = 0.000005;

/// One telemetry step: drain battery, resample load and temperature, move a little
pub fn apply_telemetry_tick<R: Rng + ?Sized>(
    status: &mut RoverStatus,
    rng: &mut R,
    battery_drain: f64,
) {
    status.battery = (status.battery - battery_drain).max(0.0);
    status.cpu_usage = rng.gen_range(CPU_BAND);
    status.ram_usage = rng.gen_range(RAM_BAND);
    status.temperature = rng.gen_range(TEMPERATURE_BAND);
    status.distance_traveled += rng.gen_range(0.0..=MAX_STEP_M);
    status.latitude += rng.gen_range(-POSITION_DRIFT_DEG..=POSITION_DRIFT_DEG);
    status.longitude += rng.gen_range(-POSITION_DRIFT_DEG..=POSITION_DRIFT_DEG);
}

/// Roll for a synthetic threat near the rover
pub fn synthesize_threat<R: Rng + ?Sized>(
    rng: &mut R,
    origin: &RoverStatus,
    probability: f64,
) -> Option<Threat> {
    if !rng.gen_bool(probability) {
        return None;
    }
    let severity = *Severity::ALL.choose(rng)?;
    let report = ThreatReport {
        severity,
        ..Default::default()
    };
    Some(report.into_threat(origin, rng))
}

pub fn spawn_telemetry_driver(service: DefenseService, settings: SimulationSettings) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(settings.telemetry_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let status = service.mutate_status(|status| {
                apply_telemetry_tick(status, &mut rand::thread_rng(), settings.battery_drain())
            });
            tracing::debug!(
                battery = status.battery,
                distance = status.distance_traveled,
                "Telemetry tick"
            );
        }
    })
}

pub fn spawn_threat_driver(service: DefenseService, settings: SimulationSettings) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(settings.threat_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let origin = service.status();
            let threat = {
                let mut rng = rand::thread_rng();
                synthesize_threat(&mut rng, &origin, settings.threat_probability())
            };

            if let Some(threat) = threat {
                tracing::info!(
                    threat_id = %threat.id,
                    severity = %threat.severity,
                    "Synthetic threat detected"
                );
                service.commit_threat(threat).await;
            }
        }
    })
}
