//! HTTP API endpoints.
//!
//! Read-only views of the coordinator for monitoring and for clients that
//! want a snapshot without opening a socket.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use crate::types::{Avatar, HexColor, PixelOwner, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub peers: usize,
    pub users: usize,
    pub board_size: usize,
    pub server_now: String,
}

/// Same content as the `init` message
#[derive(Debug, Clone, Serialize)]
pub struct BoardResponse {
    pub size: usize,
    pub pixels: Vec<HexColor>,
    pub owners: Vec<Option<PixelOwner>>,
    pub users: Vec<User>,
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let summary = state.summary().await;
    Json(HealthResponse {
        status: "ok",
        peers: summary.peers,
        users: summary.users,
        board_size: summary.board_size,
        server_now: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/board
pub async fn board(State(state): State<Arc<AppState>>) -> Json<BoardResponse> {
    let (snapshot, users) = state.snapshot_with_users().await;
    Json(BoardResponse {
        size: snapshot.size,
        pixels: snapshot.pixels,
        owners: snapshot.owners,
        users,
    })
}

/// GET /api/avatars
pub async fn avatars() -> Json<Vec<Avatar>> {
    Json(Avatar::ALL.to_vec())
}
