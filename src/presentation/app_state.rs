// Application state for HTTP and WebSocket handlers
use crate::application::defense_service::DefenseService;

#[derive(Clone)]
pub struct AppState {
    pub service: DefenseService,
    /// Outbound queue depth for each observer socket
    pub observer_buffer: usize,
}
