// Core error taxonomy
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Threat not found: {0}")]
    ThreatNotFound(Uuid),
}
