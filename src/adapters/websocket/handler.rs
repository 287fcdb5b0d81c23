//! WebSocket upgrade handler for the live notification endpoint.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection
//! lifecycle:
//! 1. Register the connection with its outbox channel
//! 2. Send the initial snapshot
//! 3. Run writer (outbox → socket) and reader (socket → commands) tasks
//! 4. Unregister on disconnect (idempotent, whichever side ends first)

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::broadcast::Topic;
use crate::domain::foundation::{ConnectionId, NotificationId};
use crate::ports::NotificationStore;

use super::messages::{ClientCommand, OutboundFrame, PongMessage};
use super::registry::ConnectionRegistry;
use super::snapshot::SnapshotSender;

/// State required for WebSocket handling, shared across connections.
#[derive(Clone)]
pub struct WebSocketState {
    pub registry: Arc<ConnectionRegistry>,
    pub store: Arc<dyn NotificationStore>,
    pub snapshot: Arc<SnapshotSender>,
}

impl WebSocketState {
    /// Creates a new WebSocket state.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        store: Arc<dyn NotificationStore>,
        snapshot: Arc<SnapshotSender>,
    ) -> Self {
        Self {
            registry,
            store,
            snapshot,
        }
    }
}

/// Handle WebSocket upgrade requests for the admin notification feed.
///
/// Route: `GET /ws/notifications`
///
/// Authentication rides on the surrounding HTTP session; this endpoint
/// performs no further checks.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection for its whole lifetime.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (sink, stream) = socket.split();

    let id = ConnectionId::new();
    let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

    state.registry.register(id, outbox_tx.clone()).await;
    tracing::debug!(connection_id = %id, "WebSocket connected");

    // Late joiners get current state, not a replay.
    state.snapshot.send_to(&outbox_tx).await;

    let mut write_task = tokio::spawn(write_loop(sink, outbox_rx));
    let mut read_task = tokio::spawn(read_loop(stream, id, state.clone(), outbox_tx));

    // Whichever side finishes first tears the other down.
    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    state.registry.unregister(id).await;
    tracing::debug!(connection_id = %id, "WebSocket disconnected");
}

/// Drains the outbox onto the socket. Sole owner of the sink, which
/// makes per-connection delivery order the channel's FIFO order.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbox_rx: mpsc::UnboundedReceiver<OutboundFrame>,
) {
    while let Some(frame) = outbox_rx.recv().await {
        let message = match frame {
            OutboundFrame::Text(text) => Message::Text(text),
            OutboundFrame::Ping => Message::Ping(Vec::new()),
            OutboundFrame::Close => break,
        };
        if sink.send(message).await.is_err() {
            break;
        }
    }
    let _ = sink.close().await;
}

/// Processes inbound frames until the client goes away.
async fn read_loop(
    mut stream: SplitStream<WebSocket>,
    id: ConnectionId,
    state: WebSocketState,
    outbox: mpsc::UnboundedSender<OutboundFrame>,
) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                process_command(&state, id, &outbox, &text).await;
            }
            Ok(Message::Pong(_)) => {
                state.registry.mark_alive(id).await;
            }
            Ok(Message::Ping(_)) => {
                // Protocol-level ping; axum answers automatically.
            }
            Ok(Message::Binary(_)) => {
                tracing::warn!(connection_id = %id, "Ignoring unsupported binary message");
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %id, "Client sent close frame");
                break;
            }
            Err(e) => {
                tracing::debug!(connection_id = %id, "Receive error: {}", e);
                break;
            }
        }
    }
}

/// Parses and dispatches one client control frame.
///
/// Stateless per call. Malformed frames - invalid JSON, unknown command,
/// unknown topic, non-numeric id - are logged and dropped; they never
/// close the connection.
pub(crate) async fn process_command(
    state: &WebSocketState,
    id: ConnectionId,
    outbox: &mpsc::UnboundedSender<OutboundFrame>,
    text: &str,
) {
    let command = match serde_json::from_str::<ClientCommand>(text) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!(connection_id = %id, error = %e, "Dropping malformed client frame");
            return;
        }
    };

    match command {
        ClientCommand::Ping => {
            let _ = outbox.send(OutboundFrame::Text(PongMessage::new().to_json()));
        }

        ClientCommand::Subscribe { data_type } => match data_type.parse::<Topic>() {
            Ok(topic) => {
                state.registry.set_subscription(id, Some(topic)).await;
                tracing::debug!(connection_id = %id, topic = %topic, "Subscription set");
            }
            Err(e) => {
                tracing::warn!(connection_id = %id, error = %e, "Dropping subscribe command");
            }
        },

        ClientCommand::Unsubscribe { .. } => {
            state.registry.set_subscription(id, None).await;
            tracing::debug!(connection_id = %id, "Subscription cleared");
        }

        ClientCommand::MarkAsRead { id: raw_id } => {
            match state.store.mark_read(NotificationId::from_i64(raw_id)).await {
                // Every open session gets the new read state, not just
                // the originator.
                Ok(_) => state.snapshot.broadcast().await,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to mark notification read");
                }
            }
        }

        ClientCommand::MarkAllAsRead => match state.store.mark_all_read().await {
            Ok(_) => state.snapshot.broadcast().await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to mark all notifications read");
            }
        },
    }
}

/// Create the axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router())
///     .with_state(ws_state);
/// ```
pub fn websocket_router() -> Router<WebSocketState> {
    Router::new().route("/ws/notifications", get(ws_handler))
}
