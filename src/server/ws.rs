//! WebSocket endpoint for channel viewers
//!
//! A viewer connects to `/ws/:channel`, joins that channel's session,
//! and receives every crawl event as one JSON text frame. Unknown
//! channels are rejected before the upgrade. When a crawl run finishes,
//! the socket stays open until the viewer disconnects.

use crate::server::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Upgrades a viewer connection, rejecting unknown channels with 404
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(channel): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    if !state.sessions.contains(&channel) {
        tracing::debug!("Rejecting connection to unknown channel '{}'", channel);
        return StatusCode::NOT_FOUND.into_response();
    }

    ws.on_upgrade(move |socket| serve_viewer(socket, channel, state))
}

/// Forwards the channel's event stream to one viewer socket
///
/// Joining registers this viewer in the channel's pool; the matching
/// leave() runs on every exit path so the 1→0 teardown is never missed.
async fn serve_viewer(mut socket: WebSocket, channel: String, state: Arc<AppState>) {
    let Some(mut events) = state.sessions.join(&channel) else {
        // Channel table can't change at runtime, so this only happens if
        // the upgrade raced a shutdown
        return;
    };

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::error!("Failed to encode event: {}", e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Viewer on '{}' lagged, {} events dropped",
                        channel,
                        skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    // Crawl run finished; hold the socket open until the
                    // viewer goes away
                    while let Some(Ok(_)) = socket.recv().await {}
                    break;
                }
            },
            message = socket.recv() => match message {
                // Inbound frames carry nothing; pings are answered by axum
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }

    state.sessions.leave(&channel);
    tracing::debug!("Viewer left channel '{}'", channel);
}
