//! Outbound fan-out to connected peers.
//!
//! Each peer owns a bounded channel drained by its socket writer task. A peer
//! whose queue is full is dropped from the set. Messages are serialized once
//! per broadcast and the encoded frame is shared between peers.

use axum::extract::ws::Utf8Bytes;
use crate::protocol::ServerMessage;
use crate::types::PeerId;
use std::collections::HashMap;
use tokio::sync::mpsc::{self, error::TrySendError};

/// WebSocket close code sent to a kicked peer
pub const KICK_CLOSE_CODE: u16 = 4000;

/// Frames a peer may have queued before it is considered stalled
pub const PEER_QUEUE_CAPACITY: usize = 1024;

/// What the writer task should do next for a peer
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text(Utf8Bytes),
    Close { code: u16, reason: String },
}

pub type PeerSender = mpsc::Sender<Outbound>;
pub type PeerReceiver = mpsc::Receiver<Outbound>;

pub fn peer_channel() -> (PeerSender, PeerReceiver) {
    mpsc::channel(PEER_QUEUE_CAPACITY)
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("peer {0} is not connected")]
    UnknownPeer(PeerId),

    #[error("peer {0} channel is closed")]
    ChannelClosed(PeerId),

    #[error("peer {0} queue is full")]
    QueueFull(PeerId),

    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The live connection set
#[derive(Debug, Default)]
pub struct Fanout {
    peers: HashMap<PeerId, PeerSender>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, peer: PeerId, sender: PeerSender) {
        self.peers.insert(peer, sender);
    }

    pub fn remove(&mut self, peer: PeerId) -> bool {
        self.peers.remove(&peer).is_some()
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.peers.contains_key(&peer)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Deliver `msg` to every peer. Returns how many peers accepted it.
    pub fn broadcast(&mut self, msg: &ServerMessage) -> usize {
        let text = match encode(msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize broadcast: {}", e);
                return 0;
            }
        };

        let mut delivered = 0;
        let mut stalled = Vec::new();
        for (peer, sender) in &self.peers {
            match sender.try_send(Outbound::Text(text.clone())) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => stalled.push(*peer),
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!(%peer, "Broadcast delivery failed, skipping peer")
                }
            }
        }
        for peer in stalled {
            self.evict(peer);
        }
        tracing::debug!(delivered, total = self.peers.len(), "Broadcast sent");
        delivered
    }

    /// Deliver `msg` to a single peer, logging instead of failing
    pub fn unicast(&mut self, peer: PeerId, msg: &ServerMessage) -> bool {
        match self.try_unicast(peer, msg) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%peer, "Unicast failed: {}", e);
                if matches!(e, DeliveryError::QueueFull(_)) {
                    self.evict(peer);
                }
                false
            }
        }
    }

    pub fn try_unicast(&self, peer: PeerId, msg: &ServerMessage) -> Result<(), DeliveryError> {
        let sender = self.peers.get(&peer).ok_or(DeliveryError::UnknownPeer(peer))?;
        let text = encode(msg)?;
        sender
            .try_send(Outbound::Text(text))
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::QueueFull(peer),
                TrySendError::Closed(_) => DeliveryError::ChannelClosed(peer),
            })
    }

    /// Ask the peer's writer to close the transport after pending messages
    pub fn close(&mut self, peer: PeerId, code: u16, reason: impl Into<String>) -> bool {
        let Some(sender) = self.peers.get(&peer) else {
            tracing::warn!(%peer, "Close requested for unknown peer");
            return false;
        };
        let outbound = Outbound::Close {
            code,
            reason: reason.into(),
        };
        match sender.try_send(outbound) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.evict(peer);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(%peer, "Close request could not be delivered");
                false
            }
        }
    }

    /// Drop a stalled peer's sender. Its writer drains what is queued, then
    /// ends, and the transport reports the disconnect.
    fn evict(&mut self, peer: PeerId) {
        if self.peers.remove(&peer).is_some() {
            tracing::warn!(%peer, capacity = PEER_QUEUE_CAPACITY, "Peer queue full, dropping peer");
        }
    }
}

fn encode(msg: &ServerMessage) -> Result<Utf8Bytes, serde_json::Error> {
    serde_json::to_string(msg).map(Utf8Bytes::from)
}
