use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Server-internal key of one 1:1 call attempt. Never required on the wire;
/// sessions are resolved from the sender's identity.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum MediaType {
    Audio,
    Video,
}

/// Why a call reached its terminal state, so the UI can tell a local
/// hang-up from peer loss or an unanswered ring.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    Hangup,
    Disconnected,
    Timeout,
}

/// Why a call attempt never started ringing.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum UnavailableReason {
    Offline,
    Busy,
}
