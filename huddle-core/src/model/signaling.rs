use crate::error::ErrorCode;
use crate::model::{EndReason, MediaType, RoomCode, UnavailableReason, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// STUN/TURN addresses handed to clients at registration. The server only
/// forwards these; NAT traversal happens entirely outside the subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Client → server signaling. Negotiation payloads (`offer`, `answer`,
/// `candidate`) are opaque JSON the server relays verbatim and never parses.
///
/// The sender identity is always the registered identity of the connection;
/// there are no client-supplied `from` fields to spoof.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    /// Bind this connection to an identity. Idempotent.
    Register { identity: UserId },
    /// Start a 1:1 call attempt toward `to`.
    CallUser {
        to: UserId,
        media_type: MediaType,
        offer: Value,
    },
    /// Accept the ringing call; the session and caller are resolved from the
    /// sender's identity.
    AnswerCall { answer: Value },
    /// Withdraw (caller) or reject (callee) a ringing call.
    CancelCall,
    /// Hang up a connected call.
    EndCall,
    /// Trickle one ICE candidate to the other call party, or to a room peer.
    IceCandidate { to: UserId, candidate: Value },
    JoinRoom { room: RoomCode },
    LeaveRoom { room: RoomCode },
    /// Directed mesh negotiation inside a shared room.
    Offer { to: UserId, payload: Value },
    Answer { to: UserId, payload: Value },
}

/// Server → client signaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// Registration ack, carrying the ICE servers clients should dial.
    Registered {
        identity: UserId,
        ice_servers: Vec<IceServerConfig>,
    },
    IncomingCall {
        from: UserId,
        media_type: MediaType,
        offer: Value,
    },
    CallAccepted {
        from: UserId,
        answer: Value,
    },
    CallCancelled {
        from: UserId,
    },
    CallEnded {
        from: UserId,
        reason: EndReason,
    },
    /// Explicit negative ack for a call attempt that never started ringing.
    CallUnavailable {
        to: UserId,
        reason: UnavailableReason,
    },
    /// Join bootstrap: everyone who was in the room before the join, exactly
    /// once per join.
    ExistingMembers {
        room: RoomCode,
        members: Vec<UserId>,
    },
    MemberJoined {
        room: RoomCode,
        member: UserId,
    },
    MemberLeft {
        room: RoomCode,
        member: UserId,
    },
    Offer {
        from: UserId,
        payload: Value,
    },
    Answer {
        from: UserId,
        payload: Value,
    },
    IceCandidate {
        from: UserId,
        candidate: Value,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}
