use super::AppState;
use crate::broadcast::{PeerSender, KICK_CLOSE_CODE};
use crate::error::{JoinError, KickError, PaintError};
use crate::protocol::ServerMessage;
use crate::types::*;

pub const KICK_REASON: &str = "disconnected by an administrator";
pub const KICK_CLOSE_REASON: &str = "kicked by administrator";

/// Raw fields of a join request, validated by `AppState::join`
#[derive(Debug, Clone, Default)]
pub struct JoinRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub avatar: Option<String>,
    pub admin_secret: Option<String>,
}

impl AppState {
    /// Register a new connection and queue its `init` snapshot before anything
    /// else can reach it.
    pub async fn connect(&self, sender: PeerSender) -> PeerId {
        let peer = self.allocate_peer_id();
        let mut session = self.session.write().await;
        session.peers.add(peer, sender);
        let init = session.init_message();
        session.peers.unicast(peer, &init);
        tracing::info!(%peer, peers = session.peers.len(), "Peer connected");
        peer
    }

    /// Forget a closed connection. Returns the identity it held, if any.
    pub async fn disconnect(&self, peer: PeerId) -> Option<User> {
        let mut session = self.session.write().await;
        let was_connected = session.peers.remove(peer);
        let user = session.registry.unregister(peer);

        if let Some(user) = &user {
            tracing::info!(%peer, user_id = %user.id, name = %user.name, "User left");
            session.broadcast_users();
        }
        if was_connected {
            tracing::info!(%peer, peers = session.peers.len(), "Peer disconnected");
        }
        user
    }

    pub async fn join(&self, peer: PeerId, request: JoinRequest) -> Result<User, JoinError> {
        let mut session = self.session.write().await;

        if session.registry.lookup_by_peer(peer).is_some() {
            tracing::debug!(%peer, "Ignoring repeated join");
            return Err(crate::error::AlreadyRegistered.into());
        }

        let name = request
            .name
            .as_deref()
            .and_then(sanitize_name)
            .ok_or(JoinError::InvalidName)?;

        let avatar: Avatar = request
            .avatar
            .as_deref()
            .and_then(|a| a.parse().ok())
            .ok_or(JoinError::InvalidAvatar)?;

        let role = self
            .admin
            .resolve(request.role.as_deref(), request.admin_secret.as_deref());

        let user = session.registry.register(peer, name, role, avatar)?;
        tracing::info!(%peer, user_id = %user.id, name = %user.name, ?role, "User joined");

        session
            .peers
            .unicast(peer, &ServerMessage::UserAccepted { user: user.clone() });
        session.broadcast_users();

        Ok(user)
    }

    pub async fn paint(
        &self,
        peer: PeerId,
        x: Option<i64>,
        y: Option<i64>,
        color: Option<&str>,
    ) -> Result<PixelBroadcast, PaintError> {
        let mut session = self.session.write().await;

        let owner = session
            .registry
            .lookup_by_peer(peer)
            .map(PixelOwner::from)
            .ok_or(PaintError::NotRegistered)?;

        let (x, y) = match (x, y) {
            (Some(x), Some(y)) if session.board.contains(x, y) => (x as usize, y as usize),
            _ => return Err(PaintError::OutOfBounds),
        };

        let color = color
            .and_then(|c| HexColor::parse(c).ok())
            .ok_or(PaintError::InvalidColor)?;

        session
            .board
            .apply_paint(x, y, color.clone(), owner.clone());

        let pixel = PixelBroadcast { x, y, color, owner };
        tracing::debug!(%peer, x, y, color = %pixel.color, "Pixel painted");
        session.peers.broadcast(&ServerMessage::Pixel {
            pixel: pixel.clone(),
        });

        Ok(pixel)
    }

    /// Notify the target and ask its transport to close. Deregistration
    /// happens in `disconnect` once the transport reports the close.
    pub async fn kick(&self, peer: PeerId, target_user_id: Option<&str>) -> Result<User, KickError> {
        let mut guard = self.session.write().await;
        let session = &mut *guard;

        let actor = session
            .registry
            .lookup_by_peer(peer)
            .filter(|user| user.role.is_admin())
            .ok_or(KickError::NotAdministrator)?;

        let target_id = target_user_id
            .filter(|id| !id.is_empty())
            .ok_or(KickError::UnknownTarget)?;
        if target_id == actor.id {
            return Err(KickError::SelfTarget);
        }

        let target_peer = session
            .registry
            .lookup_by_id(target_id)
            .ok_or(KickError::UnknownTarget)?;
        let target = session
            .registry
            .lookup_by_peer(target_peer)
            .ok_or(KickError::UnknownTarget)?;

        if target.role.is_admin() {
            return Err(KickError::TargetIsAdministrator);
        }

        tracing::info!(
            admin = %actor.id,
            target = %target.id,
            target_peer = %target_peer,
            "Kicking user"
        );

        session.peers.unicast(
            target_peer,
            &ServerMessage::Kicked {
                reason: Some(KICK_REASON.to_string()),
            },
        );
        session
            .peers
            .close(target_peer, KICK_CLOSE_CODE, KICK_CLOSE_REASON);

        Ok(target.clone())
    }
}
