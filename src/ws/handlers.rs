//! WebSocket message dispatch
//!
//! Decodes inbound frames, routes them to the coordinator and turns rejected
//! operations into the optional error reply for the sending peer.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{AppState, JoinRequest};
use crate::types::PeerId;
use std::sync::Arc;

/// Handle one decoded client message and return the reply for the sender, if any
pub async fn handle_message(
    peer: PeerId,
    msg: ClientMessage,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Join {
            name,
            role,
            avatar,
            admin_secret,
        } => {
            let request = JoinRequest {
                name,
                role,
                avatar,
                admin_secret,
            };
            match state.join(peer, request).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(%peer, "Join rejected: {}", e);
                    e.client_message()
                }
            }
        }

        ClientMessage::Paint { x, y, color } => {
            match state.paint(peer, x, y, color.as_deref()).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(%peer, ?x, ?y, ?color, "Paint rejected: {}", e);
                    e.client_message()
                }
            }
        }

        ClientMessage::Kick { target_user_id } => {
            match state.kick(peer, target_user_id.as_deref()).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(%peer, ?target_user_id, "Kick rejected: {}", e);
                    e.client_message()
                }
            }
        }

        ClientMessage::Unknown => {
            tracing::debug!(%peer, "Ignoring unrecognized message type");
            None
        }
    }
}

/// Decode a text frame, handle it and deliver any reply to the sender.
/// Undecodable frames are logged and dropped; the connection stays open.
pub async fn dispatch_text(peer: PeerId, text: &str, state: &Arc<AppState>) {
    let msg = match ClientMessage::decode(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!(%peer, "Failed to parse client message: {}", e);
            return;
        }
    };

    if let Some(reply) = handle_message(peer, msg, state).await {
        state.unicast(peer, &reply).await;
    }
}
