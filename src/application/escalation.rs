// Escalation policy - Which responder channels an incident is routed to
use crate::domain::responder::{Incident, ResponderChannel};
use crate::domain::threat::{Severity, Threat};

/// Threats below high severity are stored without notifying anyone
pub fn should_escalate(threat: &Threat) -> bool {
    threat.severity.is_escalated()
}

/// Channels to notify, in notification order: Police, Fire (critical only), Medical
pub fn decide_channels(incident: &Incident<'_>) -> Vec<ResponderChannel> {
    let mut channels = vec![ResponderChannel::Police];
    if incident.severity() == Some(Severity::Critical) {
        channels.push(ResponderChannel::Fire);
    }
    channels.push(ResponderChannel::Medical);
    channels
}
