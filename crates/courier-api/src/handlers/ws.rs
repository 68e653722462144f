//! WebSocket upgrade handler and per-connection socket loop.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use crate::state::AppState;

/// GET /ws — WebSocket upgrade
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an established WebSocket connection.
///
/// Inbound frames feed the router one at a time, so messages from this
/// connection reach the log in the order they were sent.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.relay.router().register();
    let conn_id = handle.id;
    let mut shutdown_rx = state.relay.shutdown_receiver();

    info!(conn_id = %conn_id, "WebSocket connection established");

    // Outbound forwarder: relay events → socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Failed to serialize event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound loop: one frame at a time through the router, until the
    // client closes or the engine shuts down.
    loop {
        tokio::select! {
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        state.relay.router().handle_frame(&conn_id, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                        break;
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                break;
            }
        }
    }

    outbound_task.abort();
    state.relay.router().unregister(&conn_id).await;

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
