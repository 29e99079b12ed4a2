//! WebSocket handler
//!
//! Handles WebSocket connections and frame processing.

use crate::connection::{Connection, ConnectionState};
use crate::handlers::{HandlerError, MessageDispatcher};
use crate::protocol::{GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use pairchat_core::ConnectionId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: axum::extract::ws::WebSocket) {
    let settings = state.config().connection.clone();

    // Create message channel for outgoing frames
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(settings.outbound_buffer);

    // Register connection
    let connection = state
        .connection_manager()
        .add_connection(ConnectionId::generate(), tx);
    let connection_id = connection.id();

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Send Hello frame immediately
    let hello = GatewayMessage::hello(HelloPayload {
        connection_id,
        heartbeat_interval: settings.heartbeat_interval_ms,
    });
    if let Ok(json) = hello.to_json() {
        if ws_sink.send(Message::Text(json.into())).await.is_err() {
            tracing::warn!(connection_id = %connection_id, "Failed to send hello frame");
            cleanup_connection(&state, &connection);
            return;
        }
    }

    // Clone state for tasks
    let state_recv = state.clone();
    let connection_recv = connection.clone();

    // Spawn task to receive frames from WebSocket
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    connection_recv.record_activity();
                    handle_text_message(&state_recv, &connection_recv, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    connection_recv.record_activity();
                    let error =
                        HandlerError::InvalidPayload("binary frames are not supported".into());
                    MessageDispatcher::reject(&connection_recv, &error).await;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong replies are handled automatically by axum
                    connection_recv.record_activity();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_recv.id(), "Client closed connection");
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    // Spawn task to send frames and pings to WebSocket
    let ping_every = settings.heartbeat_interval();
    let mut send_task = tokio::spawn(async move {
        let mut ping_interval = interval(ping_every);
        // The first tick completes immediately
        ping_interval.tick().await;

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    let json = match msg.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(connection_id = %connection_id, error = %e, "Failed to encode frame");
                            continue;
                        }
                    };
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::warn!(connection_id = %connection_id, "Failed to send frame to WebSocket");
                        break;
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_sink.send(Message::Ping(Vec::<u8>::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }

        // Close the WebSocket when channel is closed
        let _ = ws_sink.close().await;
    });

    // Spawn heartbeat monitoring task
    let connection_hb = connection.clone();
    let timeout = settings.heartbeat_timeout();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(Duration::from_millis((settings.heartbeat_interval_ms / 2).max(1)));

        loop {
            check_interval.tick().await;

            // Check if connection is dead (nothing heard for too long)
            let time_since = connection_hb.time_since_activity();
            if time_since > timeout {
                tracing::warn!(
                    connection_id = %connection_hb.id(),
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no activity)"
                );
                break;
            }
        }
    });

    // Wait for any task to complete
    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(connection_id = %connection_id, "Receive task ended");
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
        }
        _ = &mut heartbeat_task => {
            tracing::debug!(connection_id = %connection_id, "Heartbeat task ended");
        }
    }

    recv_task.abort();
    send_task.abort();
    heartbeat_task.abort();

    // Clean up
    cleanup_connection(&state, &connection);
}

/// Handle a text frame from the client
async fn handle_text_message(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
    // Parse the frame
    let message = match GatewayMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            let error = HandlerError::InvalidPayload(e.to_string());
            MessageDispatcher::reject(connection, &error).await;
            return;
        }
    };

    tracing::trace!(
        connection_id = %connection.id(),
        event = %message.event,
        "Received frame"
    );

    MessageDispatcher::dispatch(state, connection, message).await;
}

/// Clean up a connection on disconnect
fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    let connection_id = connection.id();

    // No longer live as far as matchmaking is concerned
    connection.set_state(ConnectionState::Disconnecting);
    state.connection_manager().remove_connection(connection_id);
    state.lobby().disconnect(connection_id);
    connection.set_state(ConnectionState::Disconnected);

    tracing::info!(
        connection_id = %connection_id,
        connected_secs = connection.age().as_secs(),
        "WebSocket connection closed"
    );
}
