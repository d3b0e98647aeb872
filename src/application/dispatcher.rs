// Dispatcher - Fans an incident out to its responder channels
use crate::application::escalation::decide_channels;
use crate::application::responder_gateway::{DispatchError, ResponderGateway};
use crate::domain::responder::{Incident, ResponderChannel};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn ResponderGateway>,
    channel_timeout: Duration,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn ResponderGateway>, channel_timeout: Duration) -> Self {
        Self {
            gateway,
            channel_timeout,
        }
    }

    /// Notify a single channel. Failures and timeouts are logged and reported as `false`.
    pub async fn notify(&self, channel: ResponderChannel, incident: &Incident<'_>) -> bool {
        let outcome = match tokio::time::timeout(
            self.channel_timeout,
            self.gateway.notify(channel, incident),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DispatchError::TimedOut {
                channel,
                timeout_ms: self.channel_timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    channel = %channel,
                    incident_id = %incident.id(),
                    error = %e,
                    "Responder notification failed"
                );
                false
            }
        }
    }

    /// Notify every channel the escalation policy selects, one after another
    /// in policy order, and return those that succeeded.
    pub async fn dispatch(&self, incident: Incident<'_>) -> Vec<ResponderChannel> {
        let mut dispatched = Vec::new();
        for channel in decide_channels(&incident) {
            if self.notify(channel, &incident).await {
                dispatched.push(channel);
            }
        }

        tracing::debug!(
            incident_id = %incident.id(),
            dispatched = ?dispatched,
            "Dispatch complete"
        );
        dispatched
    }
}
