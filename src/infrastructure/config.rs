use crate::domain::rover::RoverStatus;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub hub: HubSettings,
    #[serde(default)]
    pub rover: RoverStatus,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationSettings {
    pub enabled: bool,
    pub telemetry_period_secs: f64,
    pub threat_period_secs: f64,
    /// Chance per threat tick that a synthetic threat appears
    pub threat_probability: f64,
    /// Battery percentage lost per telemetry tick
    pub battery_drain: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            telemetry_period_secs: 5.0,
            threat_period_secs: 10.0,
            threat_probability: 0.15,
            battery_drain: 0.1,
        }
    }
}

impl SimulationSettings {
    pub fn telemetry_period(&self) -> Duration {
        period(self.telemetry_period_secs, Duration::from_secs(5))
    }

    pub fn threat_period(&self) -> Duration {
        period(self.threat_period_secs, Duration::from_secs(10))
    }

    /// Never negative, so the battery only drains
    pub fn battery_drain(&self) -> f64 {
        if self.battery_drain.is_nan() {
            0.0
        } else {
            self.battery_drain.max(0.0)
        }
    }

    pub fn threat_probability(&self) -> f64 {
        if self.threat_probability.is_nan() {
            0.0
        } else {
            self.threat_probability.clamp(0.0, 1.0)
        }
    }
}

const MIN_PERIOD_SECS: f64 = 0.001;
const MAX_PERIOD_SECS: f64 = 86_400.0;

/// Clamp to [1ms, 1 day]; non-numeric values fall back
fn period(secs: f64, fallback: Duration) -> Duration {
    Duration::try_from_secs_f64(secs.clamp(MIN_PERIOD_SECS, MAX_PERIOD_SECS)).unwrap_or(fallback)
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DispatchSettings {
    /// Simulated round-trip to a responder service
    pub latency_ms: u64,
    pub channel_timeout_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            latency_ms: 100,
            channel_timeout_ms: 2000,
        }
    }
}

impl DispatchSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn channel_timeout(&self) -> Duration {
        Duration::from_millis(self.channel_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HubSettings {
    /// Outbound queue depth per observer before events are dropped for it
    pub observer_buffer: usize,
    pub recent_threats: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            observer_buffer: 64,
            recent_threats: 10,
        }
    }
}

/// Defaults, then `config/rover.*` if present, then `ROVER__*` environment
/// variables, then `PORT`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/rover").required(false))
        .add_source(
            config::Environment::with_prefix("ROVER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("server.port", std::env::var("PORT").ok())?
        .build()?;

    Ok(settings.try_deserialize()?)
}
