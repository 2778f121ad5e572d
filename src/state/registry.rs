use crate::error::AlreadyRegistered;
use crate::types::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Registration {
    user: User,
    seq: u64,
}

/// Two-way binding between connections and the identities they registered
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    by_peer: HashMap<PeerId, Registration>,
    by_id: HashMap<UserId, PeerId>,
    next_seq: u64,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a fresh identity to `peer`. A peer can register at most once.
    pub fn register(
        &mut self,
        peer: PeerId,
        name: String,
        role: Role,
        avatar: Avatar,
    ) -> Result<User, AlreadyRegistered> {
        if self.by_peer.contains_key(&peer) {
            return Err(AlreadyRegistered);
        }

        let user = User {
            id: ulid::Ulid::new().to_string(),
            name,
            role,
            avatar,
        };

        self.next_seq += 1;
        self.by_id.insert(user.id.clone(), peer);
        self.by_peer.insert(
            peer,
            Registration {
                user: user.clone(),
                seq: self.next_seq,
            },
        );
        Ok(user)
    }

    pub fn lookup_by_peer(&self, peer: PeerId) -> Option<&User> {
        self.by_peer.get(&peer).map(|r| &r.user)
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<PeerId> {
        self.by_id.get(id).copied()
    }

    pub fn unregister(&mut self, peer: PeerId) -> Option<User> {
        let registration = self.by_peer.remove(&peer)?;
        self.by_id.remove(&registration.user.id);
        Some(registration.user)
    }

    /// Registered users in join order
    pub fn users(&self) -> Vec<User> {
        let mut registrations: Vec<_> = self.by_peer.values().collect();
        registrations.sort_by_key(|r| r.seq);
        registrations.into_iter().map(|r| r.user.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.by_peer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_peer.is_empty()
    }
}
