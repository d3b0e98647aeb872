// HTTP request handlers
use crate::domain::alert::{Alert, AlertRequest};
use crate::domain::responder::ResponderChannel;
use crate::domain::rover::{RoverStatus, RoverStatusPatch};
use crate::domain::threat::{Threat, ThreatReport, ThreatSummary};
use crate::infrastructure::http_response::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub rover: RoverStatus,
    pub observers: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub status: RoverStatus,
}

#[derive(Debug, Serialize)]
pub struct ThreatReportResponse {
    pub success: bool,
    pub threat: Threat,
    pub alerts_sent: Vec<ResponderChannel>,
}

#[derive(Debug, Serialize)]
pub struct ThreatResponse {
    pub success: bool,
    pub threat: Threat,
}

#[derive(Debug, Serialize)]
pub struct AlertHistory {
    pub total: usize,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub success: bool,
    pub alert: Alert,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online",
        timestamp: Utc::now(),
        rover: state.service.status(),
        observers: state.service.hub().observer_count(),
    })
}

pub async fn get_rover_status(State(state): State<Arc<AppState>>) -> Json<RoverStatus> {
    Json(state.service.status())
}

/// Partial status update, broadcast to observers
pub async fn update_rover_status(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<RoverStatusPatch>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    patch.validate()?;
    let status = state.service.update_status(&patch);
    Ok(Json(StatusUpdateResponse {
        success: true,
        status,
    }))
}

pub async fn list_threats(State(state): State<Arc<AppState>>) -> Json<ThreatSummary> {
    Json(state.service.threat_summary())
}

/// Report a threat; escalation completes before the response and broadcast
pub async fn report_threat(
    State(state): State<Arc<AppState>>,
    Json(report): Json<ThreatReport>,
) -> Json<ThreatReportResponse> {
    let threat = state.service.report_threat(report).await;
    Json(ThreatReportResponse {
        success: true,
        alerts_sent: threat.alerts_sent.clone(),
        threat,
    })
}

pub async fn get_threat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Threat>, ApiError> {
    Ok(Json(state.service.find_threat(id)?))
}

pub async fn neutralize_threat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ThreatResponse>, ApiError> {
    let threat = state.service.neutralize_threat(id)?;
    Ok(Json(ThreatResponse {
        success: true,
        threat,
    }))
}

pub async fn list_alerts(State(state): State<Arc<AppState>>) -> Json<AlertHistory> {
    let alerts = state.service.alerts();
    Json(AlertHistory {
        total: alerts.len(),
        alerts,
    })
}

/// Manual alert dispatch; returned to the caller only
pub async fn dispatch_alert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AlertRequest>,
) -> Json<AlertResponse> {
    let alert = state.service.dispatch_alert(request).await;
    Json(AlertResponse {
        success: true,
        alert,
    })
}

const CAMERA_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Rover Camera Stream</title>
  <style>
    body { margin: 0; padding: 0; background: #000; display: flex; justify-content: center; align-items: center; height: 100vh; }
    #stream { max-width: 100%; max-height: 100%; }
  </style>
</head>
<body>
  <img id="stream" src="/camera/feed" alt="Camera Stream">
  <script>
    setInterval(() => {
      document.getElementById('stream').src = '/camera/feed?' + new Date().getTime();
    }, 100);
  </script>
</body>
</html>
"#;

pub async fn camera_stream() -> Html<&'static str> {
    Html(CAMERA_PAGE)
}

/// Placeholder frame until a camera is wired in
pub async fn camera_feed() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Vec::<u8>::new(),
    )
}
