//! WebSocket endpoint for observing a session in real time.
//!
//! Handles the HTTP → WebSocket upgrade and the connection lifecycle:
//! join the session's room, forward broadcast changes until disconnect,
//! then leave the room.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::adapters::realtime::{
    ConnectedMessage, ObserverId, ObserverMessage, ServerMessage, SessionChange, SessionChangeHub,
};
use crate::domain::foundation::{SessionId, Timestamp};

use super::error::ErrorResponse;
use super::identity::Identity;

/// State required for the subscribe endpoint.
#[derive(Clone)]
pub struct SubscribeState {
    /// Hub for session-based routing.
    pub hub: Arc<SessionChangeHub>,
}

impl SubscribeState {
    /// Create a new subscribe state.
    pub fn new(hub: Arc<SessionChangeHub>) -> Self {
        Self { hub }
    }
}

/// Creates the router for the subscribe endpoint.
pub fn subscribe_routes(state: SubscribeState) -> Router {
    Router::new()
        .route("/sessions/:id/subscribe", get(subscribe_handler))
        .with_state(state)
}

/// GET /api/sessions/:id/subscribe - Upgrade to a session observer socket
pub async fn subscribe_handler(
    ws: WebSocketUpgrade,
    Identity(_user): Identity,
    Path(session_id): Path<String>,
    State(state): State<SubscribeState>,
) -> Response {
    let session_id: SessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

/// Runs for the lifetime of one observer connection.
async fn handle_socket(socket: WebSocket, session_id: SessionId, state: SubscribeState) {
    let (mut sender, mut receiver) = socket.split();

    let observer_id = ObserverId::new();

    let mut room_rx: broadcast::Receiver<SessionChange> =
        state.hub.join(&session_id, observer_id.clone()).await;

    let connected = ServerMessage::Connected(ConnectedMessage {
        session_id: session_id.to_string(),
        observer_id: observer_id.to_string(),
        timestamp: Timestamp::now().as_datetime().to_rfc3339(),
    });

    if let Err(e) = send_message(&mut sender, &connected).await {
        tracing::debug!("Failed to send connected message: {}", e);
        state.hub.leave(&observer_id).await;
        return;
    }

    // Forward room broadcasts to the observer
    let mut send_task = {
        let observer_id = observer_id.clone();
        tokio::spawn(async move {
            while let Ok(change) = room_rx.recv().await {
                let msg = change.to_server_message();
                if let Err(e) = send_message(&mut sender, &msg).await {
                    tracing::debug!(
                        observer_id = %observer_id,
                        "Send error, closing connection: {}",
                        e
                    );
                    break;
                }
            }
        })
    };

    // Drain incoming messages until the observer disconnects
    let hub = state.hub.clone();
    let observer_id_for_recv = observer_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if let Ok(ObserverMessage::Ping) = serde_json::from_str::<ObserverMessage>(&text)
                    {
                        tracing::trace!(observer_id = %observer_id_for_recv, "Received ping");
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        observer_id = %observer_id_for_recv,
                        "Received unsupported binary message"
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level frames are handled by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(
                        observer_id = %observer_id_for_recv,
                        "Observer sent close frame"
                    );
                    break;
                }
                Err(e) => {
                    tracing::debug!(
                        observer_id = %observer_id_for_recv,
                        "Receive error: {}",
                        e
                    );
                    break;
                }
            }
        }

        hub
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        result = &mut recv_task => {
            send_task.abort();
            if let Ok(hub) = result {
                hub.leave(&observer_id).await;
            }
            return;
        }
    }

    state.hub.leave(&observer_id).await;
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).expect("ServerMessage serialization should not fail");
    sender.send(Message::Text(json)).await
}
