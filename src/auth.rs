//! Administrator grant policy for joins.
//!
//! Without a configured secret any client asking for the administrator role
//! gets it. With `ADMIN_SECRET` set, the join must carry a matching
//! `adminSecret`; otherwise the user joins as a participant.

use crate::types::{Role, ADMINISTRATOR_ROLE};
use std::fmt;

#[derive(Clone, Default)]
pub struct AdminPolicy {
    /// Shared secret required for the administrator role (None = trust the client)
    secret: Option<String>,
}

impl AdminPolicy {
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { secret }
    }

    /// Grant the administrator role to anyone who asks for it
    pub fn open() -> Self {
        Self { secret: None }
    }

    pub fn is_enforced(&self) -> bool {
        self.secret.is_some()
    }

    /// Resolve the role a joining client ends up with
    pub fn resolve(&self, requested: Option<&str>, presented: Option<&str>) -> Role {
        if requested != Some(ADMINISTRATOR_ROLE) {
            return Role::Participant;
        }

        match &self.secret {
            None => Role::Administrator,
            Some(secret) => {
                let presented = presented.unwrap_or_default();
                if constant_time_eq(secret.as_bytes(), presented.as_bytes()) {
                    Role::Administrator
                } else {
                    tracing::warn!("Administrator role requested without a valid secret");
                    Role::Participant
                }
            }
        }
    }
}

impl fmt::Debug for AdminPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminPolicy")
            .field("enforced", &self.is_enforced())
            .finish()
    }
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
