use crate::model::{ServerMessage, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can go wrong while routing a signaling message. Each case
/// is handled next to the coordinator that produced it and surfaced to the
/// initiating client as an explicit negative event; nothing bubbles further.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalingError {
    /// The addressed identity has no live connection.
    #[error("{0} has no live connection")]
    TargetOffline(UserId),

    /// The message is only valid in a state the session or room is not in.
    #[error("{0}")]
    InvalidState(String),

    /// Room-scoped relay between identities that share no room.
    #[error("{sender} and {target} share no room")]
    NotAMember { sender: UserId, target: UserId },

    /// The frame could not be decoded into a known message.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}

/// Wire form of the error taxonomy.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    TargetOffline,
    InvalidState,
    NotAMember,
    MalformedMessage,
}

impl SignalingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SignalingError::TargetOffline(_) => ErrorCode::TargetOffline,
            SignalingError::InvalidState(_) => ErrorCode::InvalidState,
            SignalingError::NotAMember { .. } => ErrorCode::NotAMember,
            SignalingError::MalformedMessage(_) => ErrorCode::MalformedMessage,
        }
    }

    /// The observable event sent back to whoever triggered the error.
    pub fn to_event(&self) -> ServerMessage {
        ServerMessage::Error {
            code: self.code(),
            message: self.to_string(),
        }
    }
}
