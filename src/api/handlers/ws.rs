use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ws_types::WsMessage;
use crate::AppState;

/// Optional filters: `?event_id=` limits odds updates to one event,
/// `?user_id=` limits streak notices to one user.
#[derive(Debug, Default, Deserialize)]
pub struct Subscription {
    pub event_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl Subscription {
    pub fn wants(&self, msg: &WsMessage) -> bool {
        match msg {
            WsMessage::OddsUpdate(u) => self.event_id.map_or(true, |id| id == u.event_id),
            WsMessage::StreakReset(n) => self.user_id.map_or(true, |id| id == n.user_id),
        }
    }
}

pub async fn handler(
    ws: WebSocketUpgrade,
    Query(subscription): Query<Subscription>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, subscription))
}

async fn handle_socket(mut socket: WebSocket, state: AppState, subscription: Subscription) {
    tracing::info!(
        event_id = ?subscription.event_id,
        user_id = ?subscription.user_id,
        "WebSocket client connected"
    );

    let mut rx = state.ws_tx.subscribe();

    loop {
        tokio::select! {
            // Forward broadcast messages to client
            msg = rx.recv() => {
                match msg {
                    Ok(ws_msg) => {
                        if !subscription.wants(&ws_msg) {
                            continue;
                        }
                        match serde_json::to_string(&ws_msg) {
                            Ok(json) => {
                                if socket.send(Message::Text(json)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to serialize WsMessage");
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "WebSocket client lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
            // Handle incoming messages from client (ping/pong, close)
            client_msg = socket.recv() => {
                match client_msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {} // ignore text/binary from client
                    Some(Err(_)) => break,
                }
            }
        }
    }

    tracing::info!("WebSocket client disconnected");
}
