// WebSocket observer endpoint
use crate::application::broadcast_hub::{ObserverConnection, ObserverSink};
use crate::domain::event::{ClientMessage, RoverEvent};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::stream::Stream;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub async fn observer_socket(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One observer session: greeting and broadcasts go out through a writer
/// task, client messages are handled inline until the socket closes.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (connection, rx) = ObserverConnection::new(state.observer_buffer);
    let observer_id = connection.id();
    let hub = state.service.hub().clone();

    hub.on_connect(Arc::new(connection));

    let writer = tokio::spawn(async move {
        let mut frames = std::pin::pin!(outbound_frames(rx));
        while let Some(frame) = frames.next().await {
            if ws_sender.send(frame).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => handle_client_text(&state, observer_id, &text),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(observer = %observer_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    hub.on_disconnect(observer_id);
    writer.abort();
}

/// Serialize queued events into `{"event", "data"}` text frames
fn outbound_frames(mut rx: mpsc::Receiver<RoverEvent>) -> impl Stream<Item = Message> {
    async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => yield Message::Text(json),
                Err(e) => tracing::error!(event = event.name(), error = %e, "Failed to encode event"),
            }
        }
    }
}

fn handle_client_text(state: &AppState, observer_id: Uuid, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::FireLaser(target)) => {
            if let Err(e) = state.service.fire_laser(observer_id, target) {
                tracing::warn!(observer = %observer_id, error = %e, "Could not acknowledge laser shot");
            }
        }
        Err(e) => {
            tracing::debug!(observer = %observer_id, error = %e, "Ignoring unrecognized client message");
        }
    }
}
