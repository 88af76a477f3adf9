//! WebSocket endpoint of the gateway
//!
//! Browsers cannot set headers on a WebSocket handshake, so the access token
//! travels in the query string: `GET /ws?token=<jwt>`.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{app::AppState, error::ApiError, middleware::auth::authenticate};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Upgrade handler; rejects the handshake with 401 when the token is bad
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let token = params
        .get("token")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing token".to_string()))?;

    let user = authenticate(&state, token).await?;
    let user_id = user.id;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: Uuid) {
    let (connection_id, rx) = state.gateway.register(user_id).await;
    tracing::info!(user_id = %user_id, connection_id = %connection_id, "WebSocket client connected");

    pump(socket, rx).await;

    state.gateway.unregister(user_id, connection_id).await;
    tracing::info!(user_id = %user_id, connection_id = %connection_id, "WebSocket client disconnected");
}

/// Forwards queued notifications until either side goes away
async fn pump(socket: WebSocket, mut rx: mpsc::Receiver<String>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let writer = async move {
        let mut ping_interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        ping_interval.tick().await;

        loop {
            tokio::select! {
                message = rx.recv() => {
                    let Some(text) = message else { break };
                    if ws_tx.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    };

    // Clients do not talk back; only watch for the close
    let reader = async move {
        while let Some(Ok(message)) = ws_rx.next().await {
            if let Message::Close(_) = message {
                break;
            }
        }
    };

    tokio::select! {
        _ = writer => {},
        _ = reader => {},
    }
}
