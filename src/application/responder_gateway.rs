// Gateway trait for external responder services
use crate::domain::responder::{Incident, ResponderChannel};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{channel} rejected the notification: {reason}")]
    Rejected {
        channel: ResponderChannel,
        reason: String,
    },
    #[error("{channel} did not answer within {timeout_ms}ms")]
    TimedOut {
        channel: ResponderChannel,
        timeout_ms: u64,
    },
}

#[async_trait]
pub trait ResponderGateway: Send + Sync {
    /// Deliver one notification to one channel
    async fn notify(
        &self,
        channel: ResponderChannel,
        incident: &Incident<'_>,
    ) -> Result<(), DispatchError>;
}
