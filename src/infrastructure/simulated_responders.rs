// Simulated responder services - Stand-in for real emergency dispatch APIs
use crate::application::responder_gateway::{DispatchError, ResponderGateway};
use crate::domain::responder::{Incident, ResponderChannel};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SimulatedResponders {
    latency: Duration,
}

impl SimulatedResponders {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl ResponderGateway for SimulatedResponders {
    async fn notify(
        &self,
        channel: ResponderChannel,
        incident: &Incident<'_>,
    ) -> Result<(), DispatchError> {
        let (lat, lng) = incident.location();
        let severity = incident.severity().map(|s| s.as_str()).unwrap_or("n/a");
        tracing::info!(
            target: "responders",
            channel = %channel,
            incident_id = %incident.id(),
            severity,
            lat,
            lng,
            message = %incident.message(),
            "Responder alert"
        );

        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}
