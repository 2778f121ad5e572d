mod board;
mod registry;
mod session;

pub use board::{Board, BoardSnapshot};
pub use registry::IdentityRegistry;
pub use session::{JoinRequest, KICK_CLOSE_REASON, KICK_REASON};

use crate::auth::AdminPolicy;
use crate::broadcast::Fanout;
use crate::config::BoardConfig;
use crate::protocol::ServerMessage;
use crate::types::*;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Everything guarded by the coordinator lock
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) board: Board,
    pub(crate) registry: IdentityRegistry,
    pub(crate) peers: Fanout,
}

impl Session {
    fn init_message(&self) -> ServerMessage {
        let snapshot = self.board.snapshot();
        ServerMessage::Init {
            size: snapshot.size,
            pixels: snapshot.pixels,
            owners: snapshot.owners,
            users: self.registry.users(),
        }
    }

    fn broadcast_users(&mut self) {
        let users = self.registry.users();
        self.peers.broadcast(&ServerMessage::Users { users });
    }
}

/// Shared application state: the single authority over the board, the
/// identity registry and the live peer set. All mutations go through the
/// write lock and enqueue their fan-out while holding it, so every peer sees
/// broadcasts in the same order.
#[derive(Debug)]
pub struct AppState {
    session: RwLock<Session>,
    admin: AdminPolicy,
    next_peer: AtomicU64,
}

/// Read-only view used by the HTTP API
#[derive(Debug, Clone)]
pub struct StateSummary {
    pub peers: usize,
    pub users: usize,
    pub board_size: usize,
}

impl AppState {
    pub fn new(board: BoardConfig, admin: AdminPolicy) -> Self {
        Self {
            session: RwLock::new(Session {
                board: Board::new(board.size, board.default_color),
                registry: IdentityRegistry::new(),
                peers: Fanout::new(),
            }),
            admin,
            next_peer: AtomicU64::new(1),
        }
    }

    fn allocate_peer_id(&self) -> PeerId {
        PeerId(self.next_peer.fetch_add(1, Ordering::Relaxed))
    }

    /// Copy of the board
    pub async fn snapshot(&self) -> BoardSnapshot {
        self.session.read().await.board.snapshot()
    }

    /// Full `init` payload, as sent to a newly connected peer
    pub async fn init_message(&self) -> ServerMessage {
        self.session.read().await.init_message()
    }

    /// Board and user list taken under one lock
    pub async fn snapshot_with_users(&self) -> (BoardSnapshot, Vec<User>) {
        let session = self.session.read().await;
        (session.board.snapshot(), session.registry.users())
    }

    pub async fn users(&self) -> Vec<User> {
        self.session.read().await.registry.users()
    }

    pub async fn user_for_peer(&self, peer: PeerId) -> Option<User> {
        self.session
            .read()
            .await
            .registry
            .lookup_by_peer(peer)
            .cloned()
    }

    pub async fn peer_for_user(&self, id: &str) -> Option<PeerId> {
        self.session.read().await.registry.lookup_by_id(id)
    }

    pub async fn is_connected(&self, peer: PeerId) -> bool {
        self.session.read().await.peers.contains(peer)
    }

    pub async fn summary(&self) -> StateSummary {
        let session = self.session.read().await;
        StateSummary {
            peers: session.peers.len(),
            users: session.registry.len(),
            board_size: session.board.size(),
        }
    }

    /// Send a message to one peer, logging delivery failures
    pub async fn unicast(&self, peer: PeerId, msg: &ServerMessage) {
        self.session.write().await.peers.unicast(peer, msg);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(BoardConfig::default(), AdminPolicy::open())
    }
}
