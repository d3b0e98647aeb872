// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::broadcast_hub::BroadcastHub;
use crate::application::defense_service::DefenseService;
use crate::application::dispatcher::Dispatcher;
use crate::application::rover_store::RoverStore;
use crate::application::simulation::{spawn_telemetry_driver, spawn_threat_driver};
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::simulated_responders::SimulatedResponders;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    camera_feed, camera_stream, dispatch_alert, get_rover_status, get_threat, health_check,
    list_alerts, list_threats, neutralize_threat, report_threat, update_rover_status,
};
use crate::presentation::websocket::observer_socket;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Shared state and responder gateway (infrastructure layer)
    let store = Arc::new(RoverStore::new(config.rover.clone()));
    let responders = Arc::new(SimulatedResponders::new(config.dispatch.latency()));

    // Create services (application layer)
    let dispatcher = Dispatcher::new(responders, config.dispatch.channel_timeout());
    let hub = BroadcastHub::new(store.clone(), config.hub.recent_threats);
    let service = DefenseService::new(store, dispatcher, hub);

    if config.simulation.enabled {
        spawn_telemetry_driver(service.clone(), config.simulation.clone());
        spawn_threat_driver(service.clone(), config.simulation.clone());
        tracing::info!(
            telemetry_period = ?config.simulation.telemetry_period(),
            threat_period = ?config.simulation.threat_period(),
            "Simulation drivers started"
        );
    }

    // Create application state
    let state = Arc::new(AppState {
        service,
        observer_buffer: config.hub.observer_buffer,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    // Build router (presentation layer)
    let router = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rover/status", get(get_rover_status).post(update_rover_status))
        .route("/api/threats", get(list_threats).post(report_threat))
        .route("/api/threats/:id", get(get_threat))
        .route("/api/threats/:id/neutralize", post(neutralize_threat))
        .route("/api/alerts", get(list_alerts))
        .route("/api/alerts/dispatch", post(dispatch_alert))
        .route("/camera/stream", get(camera_stream))
        .route("/camera/feed", get(camera_feed))
        .route("/ws", get(observer_socket))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!(%addr, "Starting rover-sentinel: REST on /api, observers on /ws");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
