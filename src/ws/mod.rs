pub mod handlers;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use std::sync::Arc;

use crate::broadcast::{peer_channel, Outbound, PeerReceiver};
use crate::state::AppState;
use crate::types::PeerId;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // The init snapshot is queued inside `connect`, ahead of any broadcast
    let (tx, rx) = peer_channel();
    let peer = state.connect(tx).await;

    let mut send_task = tokio::spawn(pusher_loop(peer, rx, sender));

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    tracing::debug!(%peer, "Received message: {}", text.as_str());
                    handlers::dispatch_text(peer, text.as_str(), &recv_state).await;
                }
                Ok(Message::Binary(data)) => match std::str::from_utf8(&data) {
                    Ok(text) => handlers::dispatch_text(peer, text, &recv_state).await,
                    Err(_) => tracing::warn!(%peer, "Dropping non-UTF-8 binary frame"),
                },
                Ok(Message::Close(_)) => {
                    tracing::info!(%peer, "WebSocket closed by client");
                    break;
                }
                // Pings are answered by axum
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(%peer, "WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect(peer).await;
}

/// Drain the peer's outbound queue into the socket. Ends after a close
/// request or when the socket stops accepting frames.
async fn pusher_loop(
    peer: PeerId,
    mut rx: PeerReceiver,
    mut sender: SplitSink<WebSocket, Message>,
) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Text(text) => {
                if sender.send(Message::Text(text)).await.is_err() {
                    tracing::warn!(%peer, "Failed to send frame, dropping connection");
                    break;
                }
            }
            Outbound::Close { code, reason } => {
                tracing::info!(%peer, code, %reason, "Closing connection");
                let frame = CloseFrame {
                    code,
                    reason: reason.into(),
                };
                if let Err(e) = sender.send(Message::Close(Some(frame))).await {
                    tracing::warn!(%peer, "Failed to send close frame: {}", e);
                }
                break;
            }
        }
    }
}
