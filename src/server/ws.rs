//! Position streaming over WebSocket.
//!
//! Each client gets a reply to its keep-alive frames with the current
//! position, and every connected client receives the broadcast
//! position once per period. A failed send drops that client only; the
//! broadcast loop itself never stops.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use log::{debug, warn};
use serde_json::json;
use tokio::sync::broadcast;

use crate::server::model::Position;
use crate::server::AppState;

pub async fn position_ws(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_client(socket, state))
}

async fn handle_client(mut socket: WebSocket, state: Arc<AppState>) {
    let mut updates = state.broadcast.subscribe();
    debug!("WebSocket client connected");

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                // Any text frame acts as a keep-alive and is answered
                // with a position snapshot.
                Some(Ok(Message::Text(_))) => {
                    let reply = match state.mission.current_position() {
                        Some(position) => json!({
                            "position": { "lat": position.lat, "lng": position.lng }
                        }),
                        None => json!({ "error": "No active position" }),
                    };

                    if socket.send(Message::Text(reply.to_string())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!("WebSocket receive failed: {err}");
                    break;
                }
            },
            update = updates.recv() => match update {
                Ok(position) => {
                    let Ok(body) = serde_json::to_string(&position) else {
                        continue;
                    };
                    if socket.send(Message::Text(body)).await.is_err() {
                        warn!("Dropping unreachable WebSocket client");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("WebSocket client lagged {skipped} updates");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    debug!("WebSocket client disconnected");
}

/// Pushes the current position to every subscriber once per period.
/// Runs for the lifetime of the process.
pub async fn broadcast_positions(state: Arc<AppState>, period: Duration) {
    loop {
        tokio::time::sleep(period).await;

        if let Some(position) = state.mission.current_position() {
            let _ = state.broadcast.send(Position::from(position));
        }
    }
}
