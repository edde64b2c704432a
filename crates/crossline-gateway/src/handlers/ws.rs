//! Realtime WebSocket handler.
//!
//! Each socket gets a fresh connection ID and a durable registry record at
//! upgrade time. The client then registers its session ID over the socket;
//! server-initiated pushes for that session flow back over the same socket
//! until it closes.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use chrono::Utc;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crossline_contact::ContactCenter;
use crossline_core::{ConnectionId, SessionId};
use crossline_events::PushMessage;
use crossline_registry::{Registry, RegistryError};

use crate::error::ApiError;
use crate::state::GatewayState;

/// A client-to-server message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientMessage {
    action: String,
    #[serde(default)]
    session_id: Option<String>,
}

/// Realtime connection handler.
///
/// Creates the connection record and upgrades to a WebSocket.
///
/// # Errors
///
/// Returns an error if the connection record cannot be persisted.
pub async fn realtime_handler<C, R>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState<C, R>>>,
) -> Result<Response, ApiError>
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let connection_id = ConnectionId::generate();
    let expires_at = Utc::now() + state.config.connection_ttl();

    state.registry.put_connection(&connection_id, expires_at)?;

    tracing::info!(connection_id = %connection_id, "Realtime connection initiated");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id)))
}

/// Drive one connection after upgrade.
async fn handle_socket<C, R>(
    socket: WebSocket,
    state: Arc<GatewayState<C, R>>,
    connection_id: ConnectionId,
) where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    state.hub.insert(connection_id.clone(), tx.clone());

    let (sink, stream) = socket.split();
    let write_task = tokio::spawn(write_outbound(rx, sink, connection_id.clone()));

    read_inbound(stream, &state, &connection_id, &tx).await;

    // Disconnect: drop the hub entry and the durable record together
    state.hub.remove(&connection_id);
    drop(tx);
    if let Err(e) = state.registry.remove_connection(&connection_id) {
        tracing::warn!(
            connection_id = %connection_id,
            error = %e,
            "Failed to remove connection record on disconnect"
        );
    }

    write_task.abort();
    tracing::info!(connection_id = %connection_id, "Realtime connection closed");
}

/// Forward queued push messages to the socket until the channel closes.
async fn write_outbound(
    mut rx: mpsc::UnboundedReceiver<PushMessage>,
    mut sink: SplitSink<WebSocket, Message>,
    connection_id: ConnectionId,
) {
    while let Some(message) = rx.recv().await {
        let text = match serde_json::to_string(&message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to serialize push message"
                );
                continue;
            }
        };

        if let Err(e) = sink.send(Message::Text(text)).await {
            tracing::debug!(
                connection_id = %connection_id,
                error = %e,
                "Socket send failed, stopping outbound forward"
            );
            break;
        }
    }
}

/// Read client messages until the socket closes or errors.
async fn read_inbound<C, R>(
    mut stream: SplitStream<WebSocket>,
    state: &Arc<GatewayState<C, R>>,
    connection_id: &ConnectionId,
    tx: &mpsc::UnboundedSender<PushMessage>,
) where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if let Some(reply) = handle_client_message(state, connection_id, &text) {
                    if tx.send(reply).is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %connection_id, "Client closed connection");
                break;
            }
            // Pings are answered by the protocol layer; binary is ignored
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    error = %e,
                    "Error reading from client"
                );
                break;
            }
        }
    }
}

/// Handle one inbound text message, returning the reply to send, if any.
fn handle_client_message<C, R>(
    state: &Arc<GatewayState<C, R>>,
    connection_id: &ConnectionId,
    text: &str,
) -> Option<PushMessage>
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(_) => {
            return Some(PushMessage::client_error(
                "invalid_message",
                "message is not valid JSON",
            ));
        }
    };

    match message.action.as_str() {
        "ping" => Some(PushMessage::Pong),
        "register" => register_session(state, connection_id, message.session_id.as_deref()),
        other => Some(PushMessage::client_error(
            "unknown_action",
            format!("unknown action: {other}"),
        )),
    }
}

/// Attach the client's session ID to this connection's registry record.
fn register_session<C, R>(
    state: &Arc<GatewayState<C, R>>,
    connection_id: &ConnectionId,
    session_id: Option<&str>,
) -> Option<PushMessage>
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let Some(raw) = session_id.filter(|s| !s.is_empty()) else {
        return Some(PushMessage::client_error(
            "missing_session_id",
            "register requires a sessionId",
        ));
    };

    let session_id: SessionId = match raw.parse() {
        Ok(session_id) => session_id,
        Err(_) => {
            return Some(PushMessage::client_error(
                "invalid_session_id",
                format!("invalid session ID: {raw}"),
            ));
        }
    };

    match state.registry.attach_session(connection_id, &session_id) {
        Ok(()) => {
            tracing::info!(
                connection_id = %connection_id,
                session_id = %session_id,
                "Session registered"
            );
            None
        }
        Err(RegistryError::NotFound) => {
            // Record already reaped; the socket is about to close anyway
            tracing::debug!(
                connection_id = %connection_id,
                "Register raced a removed connection record"
            );
            None
        }
        Err(e) => {
            tracing::error!(
                connection_id = %connection_id,
                error = %e,
                "Failed to register session"
            );
            Some(PushMessage::client_error(
                "internal_error",
                "failed to register session",
            ))
        }
    }
}
