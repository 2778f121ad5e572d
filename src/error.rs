//! Rejection reasons for coordinator operations.
//!
//! Every rejected operation leaves the board and registry untouched. Some
//! rejections are reported to the offending peer, the rest are dropped
//! silently; `client_message` decides which.

use crate::protocol::ServerMessage;

/// A connection tried to bind a second identity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("connection already has a registered identity")]
pub struct AlreadyRegistered;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error(transparent)]
    AlreadyRegistered(#[from] AlreadyRegistered),

    #[error("invalid username")]
    InvalidName,

    #[error("invalid avatar")]
    InvalidAvatar,
}

impl JoinError {
    pub fn client_message(&self) -> Option<ServerMessage> {
        match self {
            JoinError::AlreadyRegistered(_) => None,
            JoinError::InvalidName | JoinError::InvalidAvatar => {
                Some(ServerMessage::error(self.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    #[error("must register before painting")]
    NotRegistered,

    #[error("coordinates outside the board")]
    OutOfBounds,

    #[error("invalid color")]
    InvalidColor,
}

impl PaintError {
    pub fn client_message(&self) -> Option<ServerMessage> {
        match self {
            PaintError::NotRegistered => Some(ServerMessage::error(self.to_string())),
            PaintError::OutOfBounds | PaintError::InvalidColor => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KickError {
    #[error("administrators only")]
    NotAdministrator,

    #[error("cannot kick another administrator")]
    TargetIsAdministrator,

    #[error("cannot kick yourself")]
    SelfTarget,

    #[error("unknown user")]
    UnknownTarget,
}

impl KickError {
    pub fn client_message(&self) -> Option<ServerMessage> {
        match self {
            KickError::NotAdministrator | KickError::TargetIsAdministrator => {
                Some(ServerMessage::error(self.to_string()))
            }
            KickError::SelfTarget | KickError::UnknownTarget => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_text(msg: Option<ServerMessage>) -> Option<String> {
        match msg {
            Some(ServerMessage::Error { message }) => Some(message),
            Some(other) => panic!("Expected error message, got {:?}", other),
            None => None,
        }
    }

    #[test]
    fn test_join_errors_reported() {
        assert_eq!(
            message_text(JoinError::InvalidName.client_message()).as_deref(),
            Some("invalid username")
        );
        assert_eq!(
            message_text(JoinError::InvalidAvatar.client_message()).as_deref(),
            Some("invalid avatar")
        );
        assert_eq!(
            JoinError::from(AlreadyRegistered).client_message(),
            None
        );
    }

    #[test]
    fn test_paint_errors_reported() {
        assert_eq!(
            message_text(PaintError::NotRegistered.client_message()).as_deref(),
            Some("must register before painting")
        );
        assert!(PaintError::OutOfBounds.client_message().is_none());
        assert!(PaintError::InvalidColor.client_message().is_none());
    }

    #[test]
    fn test_kick_errors_reported() {
        assert_eq!(
            message_text(KickError::NotAdministrator.client_message()).as_deref(),
            Some("administrators only")
        );
        assert_eq!(
            message_text(KickError::TargetIsAdministrator.client_message()).as_deref(),
            Some("cannot kick another administrator")
        );
        assert!(KickError::SelfTarget.client_message().is_none());
        assert!(KickError::UnknownTarget.client_message().is_none());
    }
}
